//! Shared fixtures: an app wired to in-memory infrastructure and a mock
//! mailer the tests read codes back from.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use dl_api::AppState;
use dl_core::domain::entities::user::{Gender, Role, User};
use dl_core::services::{
    AuthService, PasswordService, TokenService, TokenServiceConfig, VerificationService,
    VerificationServiceConfig,
};
use dl_infra::{InMemoryCodeStore, InMemoryUserRepository, MockMailService};

pub const PASSWORD: &str = "correct-horse-battery";
pub const MAX_PAYLOAD: usize = 64 * 1024;

pub type TestState = AppState<InMemoryUserRepository, MockMailService, InMemoryCodeStore>;

pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub mail: Arc<MockMailService>,
    pub codes: Arc<InMemoryCodeStore>,
    pub state: web::Data<TestState>,
    passwords: PasswordService,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let mail = Arc::new(MockMailService::new());
        let codes = Arc::new(InMemoryCodeStore::new());
        let token_service = Arc::new(TokenService::new(TokenServiceConfig::new("api-test-secret")).unwrap());

        let verification = Arc::new(VerificationService::new(
            Arc::clone(&mail),
            Arc::clone(&codes),
            VerificationServiceConfig::default(),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            verification,
            token_service,
            PasswordService::new(4),
        ));

        Self {
            users,
            mail,
            codes,
            state: web::Data::new(AppState::new(auth_service)),
            passwords: PasswordService::new(4),
        }
    }

    /// Store an active account directly, bypassing the code flow
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Seed".to_string(),
            last_name: "User".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Male,
            email: email.to_string(),
            password_hash: self.passwords.hash(PASSWORD).await.unwrap(),
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(user.clone()).await;
        user
    }

    /// Bearer header value for a seeded account
    pub async fn bearer_for(&self, email: &str) -> String {
        let login = self.state.auth_service.login(email, PASSWORD).await.unwrap();
        format!("Bearer {}", login.tokens.access_token)
    }
}

pub fn registration_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "date_of_birth": "1990-05-17",
        "gender": "female",
        "email": email,
        "password": PASSWORD,
    })
}
