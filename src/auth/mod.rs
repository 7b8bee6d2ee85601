mod middleware;
mod token;

pub use middleware::{AuthState, auth_guard};
pub use token::{Claims, JwtVerifier, TokenVerifier};
