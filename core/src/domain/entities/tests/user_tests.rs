use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::pending::PendingRegistration;
use crate::domain::entities::user::{Gender, ProfileUpdate, Role, User};

fn registration() -> PendingRegistration {
    PendingRegistration {
        user_id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
        gender: Gender::Female,
        email: "ada@example.com".to_string(),
        password_hash: "$2b$04$hash".to_string(),
        role: Role::Courier,
    }
}

#[test]
fn test_user_from_registration_keeps_identity() {
    let pending = registration();
    let user = User::from_registration(pending.clone());

    assert_eq!(user.id, pending.user_id);
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, Role::Courier);
    assert!(user.is_active());
    assert!(!user.is_admin());
}

#[test]
fn test_soft_delete_sets_timestamp() {
    let mut user = User::from_registration(registration());
    user.soft_delete();

    assert!(!user.is_active());
    assert_eq!(user.deleted_at, Some(user.updated_at));
}

#[test]
fn test_apply_profile_only_touches_provided_fields() {
    let mut user = User::from_registration(registration());
    user.apply_profile(ProfileUpdate {
        first_name: Some("Augusta".to_string()),
        ..Default::default()
    });

    assert_eq!(user.first_name, "Augusta");
    assert_eq!(user.last_name, "Lovelace");
    assert_eq!(user.gender, Gender::Female);
}

#[test]
fn test_role_parsing() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!(Role::Courier.to_string(), "courier");
    assert!("root".parse::<Role>().is_err());
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
}
