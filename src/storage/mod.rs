pub mod file;
pub mod memory;
pub mod postgres;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{DurableStore, DEFAULT_STORAGE_KEY};
