use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::Role;
use crate::errors::{DomainError, ErrorKind, TokenError};
use crate::services::token::{TokenService, TokenServiceConfig};

fn service(secret: &str) -> TokenService {
    TokenService::new(TokenServiceConfig::new(secret)).unwrap()
}

#[test]
fn test_issue_pair_roundtrip_claims() {
    let service = service("test-secret");
    let user_id = Uuid::new_v4();

    let pair = service.issue_pair(user_id, "a@x.com", Role::Courier).unwrap();
    let access = service.verify(&pair.access_token).unwrap();
    let refresh = service.verify(&pair.refresh_token).unwrap();

    assert_eq!(access.id, user_id);
    assert_eq!(access.email, "a@x.com");
    assert_eq!(access.role, Role::Courier);
    assert_eq!(access.iat, refresh.iat);
    assert_eq!(pair.token_type, "Bearer");
}

#[test]
fn test_access_lifetime_is_shorter_than_refresh() {
    let service = service("test-secret");

    for role in [Role::User, Role::Courier, Role::Admin] {
        let pair = service.issue_pair(Uuid::new_v4(), "e@x.com", role).unwrap();
        let access = service.verify(&pair.access_token).unwrap();
        let refresh = service.verify(&pair.refresh_token).unwrap();

        assert!(access.lifetime_seconds() < refresh.lifetime_seconds());
        assert_eq!(access.lifetime_seconds(), 3600);
        assert_eq!(refresh.lifetime_seconds(), 7200);
        assert!(pair.access_expires_at < pair.refresh_expires_at);
    }
}

#[test]
fn test_expired_token_is_rejected() {
    let service = service("test-secret");
    let past = Utc::now() - Duration::hours(3);
    let claims = Claims::new(Uuid::new_v4(), "a@x.com", Role::User, past, Duration::hours(1)).unwrap();
    let token = service.encode_jwt(&claims).unwrap();

    let err = service.verify(&token).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = service("secret-one");
    let verifier = service("secret-two");
    let pair = issuer.issue_pair(Uuid::new_v4(), "a@x.com", Role::User).unwrap();

    let err = verifier.verify(&pair.access_token).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_out_of_range_lifetime_is_fatal() {
    let mut config = TokenServiceConfig::new("test-secret");
    config.refresh_token_expiry_seconds = i64::MAX;
    let service = TokenService::new(config).unwrap();

    let err = service.issue_pair(Uuid::new_v4(), "a@x.com", Role::User).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fatal);
}

#[test]
fn test_claims_reject_unrepresentable_expiry() {
    let lifetime = Duration::try_days(1).unwrap();
    assert!(Claims::new(Uuid::new_v4(), "a@x.com", Role::User, chrono::DateTime::<Utc>::MAX_UTC, lifetime).is_none());
}

#[test]
fn test_garbage_token_is_rejected() {
    let service = service("test-secret");
    assert!(service.verify("not.a.jwt").is_err());
    assert!(service.verify("").is_err());
}

#[test]
fn test_empty_secret_is_fatal() {
    let err = TokenService::new(TokenServiceConfig::new("")).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Fatal);
}

#[test]
fn test_unsupported_algorithm_is_rejected() {
    let mut jwt = dl_shared::config::JwtConfig::new("s");
    jwt.algorithm = "RS256".to_string();
    assert!(matches!(
        TokenServiceConfig::from_jwt_config(&jwt),
        Err(TokenError::UnsupportedAlgorithm(_))
    ));
}
