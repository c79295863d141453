//! Common trait definitions for dependency injection
//!
//! The auth core consumes its collaborators through traits to enable:
//! - Dependency injection
//! - Easy testing with mock implementations
//! - Loose coupling between components

use crate::auth::types::{Provider, SocialProfile};
use crate::model::User;
use crate::tool::error::AppError;
use async_trait::async_trait;

/// External user directory consumed by the auth core.
///
/// The directory owns the account schema; the core only resolves users by
/// their social identity and triggers creation on first login.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_social_id(
        &self,
        social_id: &str,
        provider: Provider,
    ) -> Result<Option<User>, AppError>;

    async fn create_user(&self, profile: &SocialProfile) -> Result<User, AppError>;

    async fn touch_last_login(&self, user_id: &str) -> Result<(), AppError>;
}

/// Storage for the currently valid token pair of a user.
///
/// One active pair per user: a second save unconditionally overwrites the
/// previous entries (last-writer-wins). TTL enforcement lives in the store,
/// not in the application.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save_token_pair(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), AppError>;

    /// Returns whatever is currently present for the user, per kind.
    async fn get_token_pair(
        &self,
        user_id: &str,
    ) -> Result<(Option<String>, Option<String>), AppError>;

    /// Removes both entries eagerly. Absence of entries is not an error.
    async fn invalidate(&self, user_id: &str) -> Result<(), AppError>;
}
