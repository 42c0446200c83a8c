//! User infrastructure - storage and service

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryUserRepository;
pub use postgres_repository::PostgresUserRepository;
pub use service::{CreateUserRequest, UserService};
