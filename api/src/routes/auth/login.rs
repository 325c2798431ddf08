use actix_web::{web, HttpResponse};
use validator::Validate;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{CheckCredentialsResponse, LoginRequest, LoginResponse, UserResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/auth/login
///
/// ## Success (200 OK)
/// The account and a fresh access/refresh token pair.
///
/// ## Errors
/// - 401 Unauthorized: `INVALID_CREDENTIALS`, whether the email is unknown
///   or the password is wrong
pub async fn login<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let result = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
        user: UserResponse::from(&result.user),
        tokens: result.tokens.into(),
    })))
}

/// Handler for POST /api/v1/auth/check-credentials
///
/// Answers `{"valid": false}` instead of 401 for a bad pair.
pub async fn check_credentials<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let valid = state
        .auth_service
        .check_credentials(&request.email, &request.password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CheckCredentialsResponse { valid })))
}
