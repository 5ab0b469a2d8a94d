pub mod feedback;
pub mod health;

pub use health::health;
