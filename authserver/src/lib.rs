//! Auth Server Library Module
//!
//! Exposes necessary modules for testing and external usage

pub mod auth_handler;
pub mod error;
pub mod extractors;
pub mod user_handler;

// Re-export commonly used types
pub use auth_handler::{configure_auth_routes, health, RefreshRequest, SocialLoginRequest, TokenResponse};
pub use error::{ApiError, ApiResult};
pub use user_handler::configure_user_routes;
