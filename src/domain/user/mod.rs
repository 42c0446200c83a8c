//! User domain module

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_user_email, validate_user_id, validate_user_name, UserValidationError,
};
