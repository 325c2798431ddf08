//! User entity representing an account in the credential store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pending::PendingRegistration;

/// Role carried in tokens and stored with the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer placing orders
    User,
    /// A courier delivering orders
    Courier,
    /// An operator with access to the admin endpoints
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Courier => "courier",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "courier" => Ok(Role::Courier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Mutable profile fields. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    /// Normalized email address, unique among active users
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    pub role: Role,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Set when the account is deleted. `None` means active.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds the account a verified registration turns into
    pub fn from_registration(pending: PendingRegistration) -> Self {
        let now = Utc::now();
        Self {
            id: pending.user_id,
            first_name: pending.first_name,
            last_name: pending.last_name,
            date_of_birth: pending.date_of_birth,
            gender: pending.gender,
            email: pending.email,
            password_hash: pending.password_hash,
            role: pending.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Applies the provided profile fields
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn change_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Marks the account as deleted
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
