//! Request and response bodies for the public `/auth` endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use dl_core::domain::entities::token::TokenPair;
use dl_core::domain::entities::user::Gender;
use dl_core::services::auth::RegistrationRequest;

use super::profile::UserResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

impl From<RegisterRequest> for RegistrationRequest {
    fn from(request: RegisterRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

/// Used by both login and check-credentials
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgetPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
    #[validate(length(min = 8, max = 72))]
    pub new_password: String,
}

/// Returned when a code has been mailed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSentResponse {
    pub message: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl CodeSentResponse {
    pub fn new(message: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            access_expires_at: pair.access_expires_at,
            refresh_expires_at: pair.refresh_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckCredentialsResponse {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Female,
            email: "ada@example.com".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(registration().validate().is_ok());

        let mut bad_email = registration();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = registration();
        short_password.password = "short".to_string();
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_reads_lowercase_gender() {
        let json = r#"{
            "first_name": "Ada",
            "last_name": "Lovelace",
            "date_of_birth": "1990-05-17",
            "gender": "female",
            "email": "ada@example.com",
            "password": "correct-horse"
        }"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gender, Gender::Female);
    }

    #[test]
    fn test_code_must_have_six_characters() {
        let request = VerifyEmailRequest {
            email: "ada@example.com".to_string(),
            code: "12345".to_string(),
        };
        assert!(request.validate().is_err());

        let request = VerifyEmailRequest {
            email: "ada@example.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
