//! Shared API types - error envelope and JSON extractor

mod error;
mod json;
mod pagination;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use pagination::Pagination;
