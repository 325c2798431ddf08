use actix_web::{web, HttpResponse};
use validator::Validate;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::{ApiResponse, MessageResponse};

use crate::app::AppState;
use crate::dto::{ForgetPasswordRequest, ResetPasswordRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/auth/forget-password
///
/// Returns the same body for registered and unknown emails.
pub async fn forget_password<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<ForgetPasswordRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    state.auth_service.forget_password(&request.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
        "If the email is registered, a reset code has been sent",
    ))))
}

/// Handler for PUT /api/v1/auth/reset-password
///
/// ## Errors
/// - 401 Unauthorized: `VERIFICATION_CODE_INVALID` for any code problem
pub async fn reset_password<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    state
        .auth_service
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("Password has been reset"))))
}
