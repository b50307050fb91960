use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use exam_portal_backend::middleware::auth::{authorize, require_session, Claims};
use exam_portal_backend::middleware::rate_limit::{new_rps_state, rps_middleware};
use exam_portal_backend::models::account::Capability;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

fn ensure_config() {
    std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    std::env::set_var("DATABASE_URL", "postgres://localhost/exam_portal_test");
    std::env::set_var("JWT_SECRET", "test_secret_key");
    std::env::set_var("MAIL_GATEWAY_URL", "http://localhost/mail");
    std::env::set_var("MAIL_GATEWAY_SECRET", "mgsec_test");
    std::env::set_var("RETAKE_POLICY", "admin_reset");
    std::env::set_var("PUBLIC_RPS", "100");
    std::env::set_var("PORTAL_RPS", "100");
    let _ = exam_portal_backend::config::init_config();
}

fn session_token(role: &str) -> String {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        role: role.to_string(),
        school_id: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret("test_secret_key".as_bytes()),
    )
    .expect("token")
}

async fn ok_handler() -> StatusCode {
    StatusCode::OK
}

#[tokio::test]
async fn missing_session_is_redirected_to_login() {
    ensure_config();
    let app = Router::new()
        .route("/protected", get(ok_handler))
        .layer(from_fn(require_session));

    let resp = app
        .oneshot(Request::builder().uri("/protected").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["redirect_to"], "/login");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    ensure_config();
    let app = Router::new()
        .route("/protected", get(ok_handler))
        .layer(from_fn(require_session));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("authorization", "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_session_passes_through() {
    ensure_config();
    let app = Router::new()
        .route("/protected", get(ok_handler))
        .layer(from_fn(require_session));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("authorization", format!("Bearer {}", session_token("Student")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn insufficient_role_is_a_forbidden_flash_not_a_downgrade() {
    ensure_config();
    let app = Router::new()
        .route("/authoring", get(ok_handler))
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::AuthorQuestions)
        }));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/authoring")
                .header("authorization", format!("Bearer {}", session_token("Student")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["redirect_to"], "/dashboard");

    // Instructors hold the authoring capability.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/authoring")
                .header(
                    "authorization",
                    format!("Bearer {}", session_token("Instructor")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_satisfies_authoring_capability() {
    ensure_config();
    let app = Router::new()
        .route("/authoring", get(ok_handler))
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::AuthorQuestions)
        }));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/authoring")
                .header("authorization", format!("Bearer {}", session_token("Admin")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_over_the_rate_limit_are_rejected() {
    ensure_config();
    let app = Router::new()
        .route("/limited", get(ok_handler))
        .layer(from_fn_with_state(new_rps_state(2), rps_middleware));

    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/limited").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = app
        .oneshot(Request::builder().uri("/limited").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
