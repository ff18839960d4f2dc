pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use qrtrack_core::repository::{ReadRepository, Repository, Result};
pub use qrtrack_core::StorageError;
