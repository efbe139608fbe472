pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use snip_core::repository::{Insertion, Record, Repository, Result};
pub use snip_core::StorageError;
pub use sqlite::SqliteRepository;
