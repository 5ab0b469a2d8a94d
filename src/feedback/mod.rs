pub mod entry;
pub mod error;
pub mod repository;
pub mod service;

pub use entry::{Entry, NewEntry, MAX_RATING, MIN_RATING};
pub use error::FeedbackError;
pub use repository::{EntryRepository, StoreError, StoreErrorKind, StoreHealth};
pub use service::FeedbackService;
