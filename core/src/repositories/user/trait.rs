//! User repository trait defining the interface for credential persistence.
//!
//! Every lookup sees active accounts only: a row with `deleted_at` set is
//! invisible to login, refresh, profile and admin listing alike.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations map a unique-email violation to
/// `AuthError::EmailAlreadyRegistered` and store failures to
/// `DomainError::Transient`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by ID
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find an active user by normalized email
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether an active user already holds `email`
    async fn exists_active_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Insert a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError)` - `Conflict` when the email is taken by an active user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist the mutable fields of an active user
    ///
    /// # Returns
    /// * `Ok(())` - One row updated
    /// * `Err(DomainError)` - `NotFound` when no active row matched,
    ///   `Conflict` when the new email is taken
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Set `deleted_at` on an active user
    ///
    /// # Returns
    /// * `Ok(true)` - User was deleted
    /// * `Ok(false)` - No active user with that ID
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// All active users, oldest first
    async fn list_active(&self) -> Result<Vec<User>, DomainError>;
}
