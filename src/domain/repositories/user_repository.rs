//! Repository trait for user lookups during sign-in.

use crate::domain::entities::User;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to dashboard users.
///
/// This is the lookup injected into [`crate::application::services::AuthService`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by exact email address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}
