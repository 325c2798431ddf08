use uuid::Uuid;

use crate::domain::entities::pending::{
    PendingEmailChange, PendingPasswordReset, PendingPayload, VerificationFlow,
};

#[test]
fn test_cache_keys_are_namespaced_per_flow() {
    let code = "123456";
    let keys = [
        VerificationFlow::Registration.cache_key(code),
        VerificationFlow::PasswordReset.cache_key(code),
        VerificationFlow::EmailChange.cache_key(code),
    ];

    assert_eq!(keys[0], "verification:registration:123456");
    assert_eq!(keys[1], "verification:password_reset:123456");
    assert_eq!(keys[2], "verification:email_change:123456");
}

#[test]
fn test_password_reset_matches_email_case_insensitively() {
    let payload = PendingPasswordReset {
        email: "a@x.com".to_string(),
    };
    assert!(payload.matches("A@X.com", None));
    assert!(!payload.matches("b@x.com", None));
}

#[test]
fn test_email_change_requires_same_user() {
    let owner = Uuid::new_v4();
    let payload = PendingEmailChange {
        user_id: owner,
        new_email: "new@x.com".to_string(),
    };

    assert!(payload.matches("new@x.com", Some(owner)));
    assert!(!payload.matches("new@x.com", Some(Uuid::new_v4())));
    assert!(!payload.matches("new@x.com", None));
    assert!(!payload.matches("old@x.com", Some(owner)));
}
