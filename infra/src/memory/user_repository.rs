use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use dl_core::domain::entities::user::User;
use dl_core::errors::{AuthError, DomainError};
use dl_core::repositories::UserRepository;

/// Keeps users in a map and enforces the same active-email uniqueness as the
/// `users.active_email` index.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without the uniqueness check, for seeding fixtures
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Fetch a row whether or not it is deleted
    pub async fn get_any(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.is_active() && u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).filter(|u| u.is_active()).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.is_active() && u.email == email)
            .cloned())
    }

    async fn exists_active_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(email_taken(&*self.users.read().await, email, None))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, Some(user.id)) {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }
        match users.get_mut(&user.id) {
            Some(existing) if existing.is_active() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(AuthError::UserNotFound.into()),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if user.is_active() => {
                user.soft_delete();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_active(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}
