//! API layer - HTTP endpoints and middleware

pub mod api_keys;
pub mod departments;
pub mod health;
pub mod middleware;
pub mod organizations;
pub mod router;
pub mod state;
pub mod teams;
pub mod types;
pub mod users;

pub use middleware::RequireUser;
pub use router::{create_router, create_router_with_state};
pub use state::AppState;
