use actix_web::{web, HttpResponse};
use validator::Validate;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{CodeSentResponse, RegisterRequest, UserResponse, VerifyEmailRequest};
use crate::handlers::ApiError;

const CODE_SENT: &str = "Verification code sent to email";

/// Handler for POST /api/v1/auth/register-user
///
/// Parks the registration and mails a code. Nothing is stored in the
/// credential store until the code is verified.
///
/// ## Errors
/// - 400 Bad Request: invalid fields
/// - 409 Conflict: the email belongs to an active account
/// - 503 Service Unavailable: cache or mail provider down
pub async fn register_user<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let issued = state.auth_service.register_user(request.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CodeSentResponse::new(CODE_SENT, issued.expires_at))))
}

/// Handler for POST /api/v1/auth/register-courier
pub async fn register_courier<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let issued = state.auth_service.register_courier(request.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CodeSentResponse::new(CODE_SENT, issued.expires_at))))
}

/// Handler for POST /api/v1/auth/verify-email
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "code": "123456"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: the code was issued for another email
/// - 404 Not Found: unknown, expired or already used code
/// - 409 Conflict: the email was registered in the meantime
pub async fn verify_email<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let user = state
        .auth_service
        .verify_email(&request.email, &request.code)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse::from(&user))))
}
