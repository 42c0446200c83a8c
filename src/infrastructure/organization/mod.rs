//! Organization infrastructure - storage and service

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryOrganizationRepository;
pub use postgres_repository::PostgresOrganizationRepository;
pub use service::OrganizationService;
