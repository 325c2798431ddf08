//! Mock implementations for testing the authentication service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use chrono::{NaiveDate, Utc};

use crate::domain::entities::user::{Gender, Role, User};
use crate::errors::{AuthError, DomainError};
use crate::repositories::UserRepository;
use crate::services::auth::{AuthService, RegistrationRequest};
use crate::services::password::PasswordService;
use crate::services::token::{TokenService, TokenServiceConfig};
use crate::services::verification::tests::mocks::{MockCodeStore, MockMailService};
use crate::services::verification::{VerificationService, VerificationServiceConfig};

// Mock user repository enforcing the active-email uniqueness the database provides
#[derive(Default)]
pub struct MockUserRepository {
    pub users: Arc<RwLock<HashMap<Uuid, User>>>,
    pub should_fail: AtomicBool,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    pub async fn count_with_email(&self, email: &str) -> usize {
        self.users
            .read()
            .await
            .values()
            .filter(|u| u.email == email && u.is_active())
            .count()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::transient("Database error"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.check()?;
        Ok(self.users.read().await.get(&id).filter(|u| u.is_active()).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.check()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email && u.is_active())
            .cloned())
    }

    async fn exists_active_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_active_by_email(email).await?.is_some())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.check()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email && u.is_active()) {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        self.check()?;
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email && u.is_active())
        {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }
        match users.get_mut(&user.id) {
            Some(existing) if existing.is_active() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(DomainError::NotFound {
                resource: "User".to_string(),
            }),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check()?;
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
        self.check()?;
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

pub type TestAuthService = AuthService<MockUserRepository, MockMailService, MockCodeStore>;

pub struct TestContext {
    pub service: Arc<TestAuthService>,
    pub users: Arc<MockUserRepository>,
    pub mail: Arc<MockMailService>,
    pub store: Arc<MockCodeStore>,
    pub passwords: PasswordService,
}

pub fn setup() -> TestContext {
    let users = Arc::new(MockUserRepository::new());
    let mail = Arc::new(MockMailService::new(false));
    let store = Arc::new(MockCodeStore::new(false));
    let verification = Arc::new(VerificationService::new(
        mail.clone(),
        store.clone(),
        VerificationServiceConfig::default(),
    ));
    let tokens = Arc::new(TokenService::new(TokenServiceConfig::new("test-secret")).unwrap());
    let passwords = PasswordService::new(4);

    let service = Arc::new(AuthService::new(users.clone(), verification, tokens, passwords));

    TestContext {
        service,
        users,
        mail,
        store,
        passwords,
    }
}

pub fn registration(email: &str, password: &str) -> RegistrationRequest {
    RegistrationRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
        gender: Gender::Female,
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Insert an active account directly, bypassing the registration flow
pub async fn seed_user(ctx: &TestContext, email: &str, password: &str, role: Role) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        first_name: "Seed".to_string(),
        last_name: "User".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
        gender: Gender::Male,
        email: email.to_string(),
        password_hash: ctx.passwords.hash(password).await.unwrap(),
        role,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    ctx.users.insert(user.clone()).await;
    user
}
