pub mod auth;
pub mod method;
