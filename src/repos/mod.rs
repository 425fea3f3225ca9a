pub mod error;
pub mod memory_user_repo;
pub mod pg_user_repo;
pub mod user_repo;

pub use memory_user_repo::InMemoryUserDirectory;
pub use pg_user_repo::PgUserDirectory;
pub use user_repo::{NewUser, UserDirectory, UserRecord};
