use actix_web::{web, HttpResponse};
use validator::Validate;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{RefreshTokenRequest, TokenResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/auth/refresh-token
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: expired or invalid token, or the account is gone
pub async fn refresh_token<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    request.validate()?;

    let pair = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse::from(pair))))
}
