//! Registration and reset flows over the infra implementations
//!
//! The Redis tests require a running Redis instance.
//! Run with: cargo test -p dl_infra --test verification_flow_integration -- --ignored

use std::sync::{Arc, Once};

use chrono::NaiveDate;

use dl_core::domain::entities::user::{Gender, Role};
use dl_core::errors::ErrorKind;
use dl_core::repositories::UserRepository;
use dl_core::services::verification::CodeStoreTrait;
use dl_core::services::{
    AuthService, PasswordService, RegistrationRequest, TokenService, TokenServiceConfig,
    VerificationService, VerificationServiceConfig,
};
use dl_infra::cache::{CacheConfig, RedisClient, RedisCodeStore};
use dl_infra::mail::MockMailService;
use dl_infra::memory::{InMemoryCodeStore, InMemoryUserRepository};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn build<C: CodeStoreTrait + 'static>(
    store: Arc<C>,
) -> (
    AuthService<InMemoryUserRepository, MockMailService, C>,
    Arc<InMemoryUserRepository>,
    Arc<MockMailService>,
) {
    let users = Arc::new(InMemoryUserRepository::new());
    let mail = Arc::new(MockMailService::new());
    let verification = Arc::new(VerificationService::new(
        mail.clone(),
        store,
        VerificationServiceConfig::default(),
    ));
    let tokens = Arc::new(TokenService::new(TokenServiceConfig::new("integration-secret")).unwrap());
    let service = AuthService::new(users.clone(), verification, tokens, PasswordService::new(4));
    (service, users, mail)
}

fn registration(email: &str) -> RegistrationRequest {
    RegistrationRequest {
        first_name: "Katherine".to_string(),
        last_name: "Johnson".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1918, 8, 26).unwrap(),
        gender: Gender::Female,
        email: email.to_string(),
        password: "password-1".to_string(),
    }
}

#[tokio::test]
async fn test_registration_over_in_memory_store() {
    init_tracing();
    let (service, users, mail) = build(Arc::new(InMemoryCodeStore::new()));

    service.register_user(registration("k@x.com")).await.unwrap();
    let code = mail.last_code_for("k@x.com").unwrap();

    let user = service.verify_email("k@x.com", &code).await.unwrap();
    assert_eq!(user.role, Role::User);
    assert!(users.find_active_by_email("k@x.com").await.unwrap().is_some());

    let replay = service.verify_email("k@x.com", &code).await.unwrap_err();
    assert_eq!(replay.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_registration_and_reset_over_redis() {
    init_tracing();
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let prefix = format!("auth_it_{}", rand::random::<u32>());
    let client = RedisClient::new(CacheConfig::new(url).with_prefix(prefix)).await.unwrap();
    let (service, _users, mail) = build(Arc::new(RedisCodeStore::new(client)));

    service.register_courier(registration("r@x.com")).await.unwrap();
    let code = mail.last_code_for("r@x.com").unwrap();

    let wrong = service.verify_email("other@x.com", &code).await.unwrap_err();
    assert_eq!(wrong.kind(), ErrorKind::Unauthorized);

    let user = service.verify_email("r@x.com", &code).await.unwrap();
    assert_eq!(user.role, Role::Courier);

    service.forget_password("r@x.com").await.unwrap();
    let reset_code = mail.last_code_for("r@x.com").unwrap();
    service
        .reset_password("r@x.com", &reset_code, "password-2")
        .await
        .unwrap();

    assert!(service.login("r@x.com", "password-1").await.is_err());
    assert!(service.login("r@x.com", "password-2").await.is_ok());
}
