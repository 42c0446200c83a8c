//! API key domain module

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKey, ApiKeyId};
pub use repository::ApiKeyRepository;
pub use validation::{validate_api_key_id, validate_api_key_name, ApiKeyValidationError};
