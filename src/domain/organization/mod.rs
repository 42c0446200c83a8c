//! Organization domain module

mod entity;
mod repository;

pub use entity::{Organization, OrganizationId, OrganizationMember, UserOrganization};
pub use repository::OrganizationRepository;
