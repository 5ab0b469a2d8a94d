pub mod response;

pub use response::{ApiResponse, ApiResult, JSON_CONTENT_TYPE};
