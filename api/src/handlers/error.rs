//! Mapping from domain failures to HTTP responses
//!
//! Every error body is an `ErrorResponse` with a stable `error` code.
//! Store and mail failures are reported with a generic message; their
//! detail only reaches the logs.

use actix_web::{
    error::{JsonPayloadError, PathError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use dl_core::errors::{AuthError, DomainError, ErrorKind, TokenError, VerificationError};
use dl_shared::{error_codes, ErrorResponse};
use thiserror::Error;
use validator::ValidationErrors;

/// Error returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request data")]
    Validation(#[from] ValidationErrors),

    /// Body or path that could not be parsed at all
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Domain(e) => e.kind(),
            ApiError::Validation(_) | ApiError::BadRequest(_) => ErrorKind::Validation,
        }
    }

    /// Stable machine-readable code for the response body
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Domain(DomainError::Auth(e)) => match e {
                AuthError::InvalidCredentials | AuthError::IncorrectCurrentPassword => {
                    error_codes::INVALID_CREDENTIALS
                }
                AuthError::InvalidResetCode => error_codes::VERIFICATION_CODE_INVALID,
                AuthError::EmailAlreadyRegistered => error_codes::EMAIL_TAKEN,
                _ => code_for_kind(e.kind()),
            },
            ApiError::Domain(DomainError::Token(e)) => match e {
                TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
                TokenError::InvalidToken => error_codes::TOKEN_INVALID,
                TokenError::MissingToken => error_codes::MISSING_TOKEN,
                _ => code_for_kind(e.kind()),
            },
            ApiError::Domain(DomainError::Verification(
                VerificationError::CodeNotFound | VerificationError::Mismatch,
            )) => error_codes::VERIFICATION_CODE_INVALID,
            other => code_for_kind(other.kind()),
        }
    }

    fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Transient => "Service temporarily unavailable, please retry later".to_string(),
            ErrorKind::Fatal => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for_kind(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.error_code();

        match self.kind() {
            ErrorKind::Fatal => tracing::error!(error = %self, code, "Request failed"),
            ErrorKind::Transient => tracing::warn!(error = %self, code, "Dependency unavailable"),
            _ => tracing::debug!(error = %self, code, status = status.as_u16(), "Request rejected"),
        }

        let mut body = ErrorResponse::new(code, self.public_message());
        if let ApiError::Validation(errors) = self {
            body = body.add_detail("fields", errors);
        }

        HttpResponse::build(status).json(body)
    }
}

pub fn status_for_kind(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for_kind(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => error_codes::VALIDATION_ERROR,
        ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
        ErrorKind::Forbidden => error_codes::FORBIDDEN,
        ErrorKind::NotFound => error_codes::NOT_FOUND,
        ErrorKind::Conflict => error_codes::CONFLICT,
        ErrorKind::Transient => error_codes::SERVICE_UNAVAILABLE,
        ErrorKind::Fatal => error_codes::INTERNAL_ERROR,
    }
}

/// Malformed JSON bodies get the same envelope as validation failures
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}
