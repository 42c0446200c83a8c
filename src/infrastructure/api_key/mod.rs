//! API key infrastructure - generation, storage and service

mod generator;
mod in_memory;
mod postgres_repository;
mod service;

pub use generator::{ApiKeyGenerator, GeneratedApiKey};
pub use in_memory::InMemoryApiKeyRepository;
pub use postgres_repository::PostgresApiKeyRepository;
pub use service::{ApiKeyService, CreatedApiKey};
