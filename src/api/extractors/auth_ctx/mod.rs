/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証ステージが request extensions に入れた AuthCtx を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthCtx
 * - CurrentIdentity
 */

mod core;
mod types;

pub use self::core::CurrentIdentity;
pub use self::types::AuthCtx;
