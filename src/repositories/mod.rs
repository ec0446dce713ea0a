pub mod memory;
pub mod message_repository;
pub mod user_repository;

pub use memory::{InMemoryMessageStore, InMemoryUserDirectory};
pub use message_repository::{MessageStore, PgMessageStore};
pub use user_repository::{PgUserDirectory, UserDirectory};
