mod identity;
mod middleware;
pub mod handler;
pub mod routes;

pub use identity::{CallerIdentity, IdentityVerifier, JwtVerifier};
pub use middleware::require_user;
