pub mod bearer;
pub mod factory;
pub mod identity;
pub mod policy;
pub mod token_codec;

pub use factory::build_token_codec;
pub use identity::Identity;
pub use token_codec::{TokenCodec, TokenError};
