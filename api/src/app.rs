//! Application state and factory
//!
//! `create_app` is shared by the binary and the integration tests, so the
//! route table exists in exactly one place. Request logging is added by the
//! caller (`main` wraps the app in `TracingLogger`).

use std::sync::Arc;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};

use dl_core::repositories::UserRepository;
use dl_core::services::auth::AuthService;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_shared::{error_codes, ErrorResponse};

use crate::handlers::{json_error_handler, path_error_handler};
use crate::middleware::JwtAuth;
use crate::routes::admin::{delete_user, list_users};
use crate::routes::auth::{
    login::{check_credentials, login},
    password::{forget_password, reset_password},
    refresh::refresh_token,
    register::{register_courier, register_user, verify_email},
};
use crate::routes::health::health_check;
use crate::routes::profile::{
    change_email, change_password, delete_profile, get_profile, update_profile, verify_new_email,
};

/// Application state that holds shared services
pub struct AppState<U, M, C>
where
    U: UserRepository,
    M: MailServiceTrait,
    C: CodeStoreTrait,
{
    pub auth_service: Arc<AuthService<U, M, C>>,
}

impl<U, M, C> AppState<U, M, C>
where
    U: UserRepository,
    M: MailServiceTrait,
    C: CodeStoreTrait,
{
    pub fn new(auth_service: Arc<AuthService<U, M, C>>) -> Self {
        Self { auth_service }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, M, C>(
    app_state: web::Data<AppState<U, M, C>>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let jwt_auth = JwtAuth::new(Arc::clone(app_state.auth_service.token_service()));

    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(max_payload_size)
                .error_handler(json_error_handler),
        )
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register-user", web::post().to(register_user::<U, M, C>))
                        .route("/register-courier", web::post().to(register_courier::<U, M, C>))
                        .route("/verify-email", web::post().to(verify_email::<U, M, C>))
                        .route("/login", web::post().to(login::<U, M, C>))
                        .route("/check-credentials", web::post().to(check_credentials::<U, M, C>))
                        .route("/refresh-token", web::post().to(refresh_token::<U, M, C>))
                        .route("/forget-password", web::post().to(forget_password::<U, M, C>))
                        .route("/reset-password", web::put().to(reset_password::<U, M, C>)),
                )
                .service(
                    web::scope("/profile")
                        .wrap(jwt_auth.clone())
                        .route("", web::get().to(get_profile::<U, M, C>))
                        .route("", web::put().to(update_profile::<U, M, C>))
                        .route("", web::delete().to(delete_profile::<U, M, C>))
                        .route("/change-password", web::put().to(change_password::<U, M, C>))
                        .route("/change-email", web::put().to(change_email::<U, M, C>))
                        .route("/verify-new-email", web::post().to(verify_new_email::<U, M, C>)),
                )
                .service(
                    web::scope("/admin")
                        .wrap(jwt_auth)
                        .route("/users", web::get().to(list_users::<U, M, C>))
                        .route("/users/{id}", web::delete().to(delete_user::<U, M, C>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
