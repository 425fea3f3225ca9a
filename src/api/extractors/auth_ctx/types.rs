/*
 * Responsibility
 * - 認証ステージの結果をリクエスト単位で表す型
 * - middleware が request extensions に格納し、policy / handler はこの型だけを読む
 *
 * Notes
 * - プロセス全体で共有しない (リクエストをまたいで見えてはいけない)
 */

use crate::services::auth::Identity;

#[derive(Debug, Clone)]
pub enum AuthCtx {
    /// No credential, or a credential that failed verification.
    Anonymous,
    Authenticated {
        identity: Identity,
        /// `jti` of the presented token, for log correlation only.
        token_id: String,
    },
}

impl AuthCtx {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { identity, .. } => Some(identity),
        }
    }

    pub fn token_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token_id, .. } => Some(token_id),
        }
    }
}
