/// Factory: build `TokenCodec` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::TokenCodec;

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    let codec = TokenCodec::new(
        &config.signing_secret,
        config.issuer.clone(),
        config.access_token_validity,
    );

    tracing::info!(
        issuer = codec.issuer(),
        validity_seconds = codec.validity().num_seconds(),
        "session token codec ready"
    );

    Arc::new(codec)
}
