//! Endpoints acting on the caller's own account
//!
//! Every handler here sits behind `JwtAuth` and takes the caller from
//! `AuthContext`, never from the request body.

use actix_web::{web, HttpResponse};
use validator::Validate;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::{ApiResponse, MessageResponse};

use crate::app::AppState;
use crate::dto::auth::CodeSentResponse;
use crate::dto::{
    ChangeEmailRequest, ChangePasswordRequest, TokenResponse, UpdateProfileRequest, UserResponse,
    VerifyNewEmailRequest,
};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/profile
pub async fn get_profile<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let user = state.auth_service.get_profile(ctx.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(&user))))
}

/// Handler for PUT /api/v1/profile
pub async fn update_profile<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let user = state
        .auth_service
        .update_profile(ctx.user_id, request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(&user))))
}

/// Handler for DELETE /api/v1/profile
///
/// Soft delete. Issued tokens stay valid until they expire, but refresh
/// and every profile call stop working immediately.
pub async fn delete_profile<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    state.auth_service.delete_profile(ctx.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("Account deleted"))))
}

/// Handler for PUT /api/v1/profile/change-password
pub async fn change_password<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    state
        .auth_service
        .change_password(ctx.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("Password changed"))))
}

/// Handler for PUT /api/v1/profile/change-email
///
/// Mails a code to the new address. The stored email is unchanged until
/// the code comes back through `verify-new-email`.
pub async fn change_email<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
    request: web::Json<ChangeEmailRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let issued = state
        .auth_service
        .change_email(ctx.user_id, &request.new_email)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CodeSentResponse::new(
        "Verification code sent to the new email",
        issued.expires_at,
    ))))
}

/// Handler for POST /api/v1/profile/verify-new-email
///
/// Returns a new token pair, since the old tokens carry the old email.
pub async fn verify_new_email<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
    request: web::Json<VerifyNewEmailRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let pair = state
        .auth_service
        .verify_new_email(ctx.user_id, &request.new_email, &request.code)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse::from(pair))))
}
