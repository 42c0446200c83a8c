//! Request middleware - authentication and role context extractors

mod auth;
mod org_context;

pub use auth::RequireUser;
pub use org_context::{DepartmentContext, OrganizationContext, TeamContext};
