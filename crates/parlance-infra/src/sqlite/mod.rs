//! SQLite implementations of the parlance-core gateway traits.

pub mod chat;
pub mod local;
pub mod pool;

pub use chat::SqliteChatStore;
pub use local::SqliteSelectionCache;
pub use pool::DatabasePool;
