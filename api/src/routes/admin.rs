//! Account administration. `AuthService` checks the caller's stored role, so
//! a non-admin account gets 403 here.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::{ApiResponse, MessageResponse};

use crate::app::AppState;
use crate::dto::UserResponse;
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/admin/users
pub async fn list_users<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let users = state.auth_service.list_users(ctx.user_id).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

/// Handler for DELETE /api/v1/admin/users/{id}
pub async fn delete_user<U, M, C>(
    state: web::Data<AppState<U, M, C>>,
    ctx: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let target_id = path.into_inner();
    state
        .auth_service
        .delete_user(ctx.user_id, target_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("User deleted"))))
}
