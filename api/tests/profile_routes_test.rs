//! HTTP tests for the authenticated `/profile` and `/admin` endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{TestContext, MAX_PAYLOAD, PASSWORD};
use dl_api::create_app;
use dl_core::domain::entities::user::Role;
use dl_core::services::{TokenService, TokenServiceConfig};

#[actix_rt::test]
async fn test_missing_and_invalid_tokens_are_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/v1/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "MISSING_TOKEN");

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");

    // Signed with a different secret
    let user = ctx.seed_user("ada@example.com", Role::User).await;
    let foreign = TokenService::new(TokenServiceConfig::new("some-other-secret")).unwrap();
    let pair = foreign.issue_pair(user.id, &user.email, user.role).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_get_and_update_profile() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("ada@example.com", Role::User).await;
    let bearer = ctx.bearer_for("ada@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["first_name"], "Seed");

    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", bearer))
        .set_json(json!({ "first_name": "Grace", "gender": "female" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["first_name"], "Grace");
    assert_eq!(body["data"]["last_name"], "User");
    assert_eq!(body["data"]["gender"], "female");
}

#[actix_rt::test]
async fn test_change_password_requires_current_password() {
    let ctx = TestContext::new();
    ctx.seed_user("ada@example.com", Role::User).await;
    let bearer = ctx.bearer_for("ada@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::put()
        .uri("/api/v1/profile/change-password")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({ "current_password": "not-my-password", "new_password": "brand-new-pass" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/v1/profile/change-password")
        .insert_header(("Authorization", bearer))
        .set_json(json!({ "current_password": PASSWORD, "new_password": "brand-new-pass" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert!(ctx
        .state
        .auth_service
        .check_credentials("ada@example.com", "brand-new-pass")
        .await
        .unwrap());
}

#[actix_rt::test]
async fn test_change_email_flow() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("ada@example.com", Role::User).await;
    ctx.seed_user("taken@example.com", Role::User).await;
    let bearer = ctx.bearer_for("ada@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::put()
        .uri("/api/v1/profile/change-email")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({ "new_email": "taken@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri("/api/v1/profile/change-email")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({ "new_email": "ada.new@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let code = ctx.mail.last_code_for("ada.new@example.com").unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/profile/verify-new-email")
        .insert_header(("Authorization", bearer))
        .set_json(json!({ "new_email": "ada.new@example.com", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let access = body["data"]["access_token"].as_str().unwrap();
    let claims = ctx.state.auth_service.token_service().verify(access).unwrap();
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.email, "ada.new@example.com");

    let stored = ctx.users.get_any(user.id).await.unwrap();
    assert_eq!(stored.email, "ada.new@example.com");
}

#[actix_rt::test]
async fn test_deleted_profile_is_gone() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("ada@example.com", Role::User).await;
    let bearer = ctx.bearer_for("ada@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", bearer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let stored = ctx.users.get_any(user.id).await.unwrap();
    assert!(stored.deleted_at.is_some());
}

#[actix_rt::test]
async fn test_admin_routes_require_admin_role() {
    let ctx = TestContext::new();
    ctx.seed_user("ada@example.com", Role::User).await;
    let bearer = ctx.bearer_for("ada@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FORBIDDEN");

    let req = test::TestRequest::get().uri("/api/v1/admin/users").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_admin_lists_and_deletes_users() {
    let ctx = TestContext::new();
    ctx.seed_user("root@example.com", Role::Admin).await;
    let target = ctx.seed_user("ada@example.com", Role::User).await;
    let bearer = ctx.bearer_for("root@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", target.id))
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", target.id))
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/api/v1/admin/users/not-a-uuid")
        .insert_header(("Authorization", bearer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let login = ctx.state.auth_service.login("ada@example.com", PASSWORD).await;
    assert!(login.is_err());
}
