pub mod manager;
pub mod repository;

pub use manager::{classify, DatabaseError, DatabaseManager};
pub use repository::PgEntryRepository;
