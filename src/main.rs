use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use exam_portal_backend::middleware::auth::{authorize, require_admin_or_bootstrap, require_session};
use exam_portal_backend::models::account::Capability;
use exam_portal_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Outbox worker: drains pending mail-gateway notifications with retry
    // backoff. Caller requests never wait on delivery.
    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                match state.notification_service.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Notification worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/entrance/:school_code/login",
            post(routes::auth::entrance_login),
        )
        .layer(from_fn_with_state(
            exam_portal_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            exam_portal_backend::middleware::rate_limit::rps_middleware,
        ));

    // Admin-gated once an Admin exists; open on first boot.
    let register_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .layer(from_fn_with_state(app_state.clone(), require_admin_or_bootstrap))
        .layer(from_fn_with_state(
            exam_portal_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            exam_portal_backend::middleware::rate_limit::rps_middleware,
        ));

    let portal_api = Router::new()
        .route("/api/dashboard", get(routes::course::dashboard))
        .route("/api/courses", get(routes::course::list_courses))
        .route("/api/exam/:course_code", get(routes::exam::get_paper))
        .route("/api/exam/:course_code/submit", post(routes::exam::submit_exam))
        .route("/api/exam/:course_code/result", get(routes::exam::get_result))
        .layer(from_fn(require_session))
        .layer(from_fn_with_state(
            exam_portal_backend::middleware::rate_limit::new_rps_state(config.portal_rps),
            exam_portal_backend::middleware::rate_limit::rps_middleware,
        ));

    let authoring_api = Router::new()
        .route(
            "/api/questions",
            get(routes::question::list_questions)
                .post(routes::question::create_question)
                .patch(routes::question::update_question)
                .delete(routes::question::delete_question),
        )
        .route(
            "/api/question-backgrounds",
            post(routes::question::create_background),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::AuthorQuestions)
        }));

    let school_admin_api = Router::new()
        .route(
            "/api/admin/schools",
            get(routes::admin::list_schools).post(routes::admin::create_school),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ManageSchools)
        }));

    let classroom_admin_api = Router::new()
        .route(
            "/api/admin/classrooms",
            get(routes::admin::list_classrooms).post(routes::admin::create_classroom),
        )
        .route(
            "/api/admin/accounts/classroom",
            post(routes::admin::assign_classroom),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ManageClassrooms)
        }));

    let course_admin_api = Router::new()
        .route("/api/admin/courses", post(routes::course::create_course))
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ManageCourses)
        }));

    let window_admin_api = Router::new()
        .route(
            "/api/admin/exam-windows",
            get(routes::admin::list_exam_windows).post(routes::admin::create_exam_window),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ManageExamWindows)
        }));

    let accounts_admin_api = Router::new()
        .route(
            "/api/entrance/:school_code/register",
            post(routes::auth::register_prospective),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ManageAccounts)
        }));

    let score_admin_api = Router::new()
        .route("/api/admin/scores/:id/reset", post(routes::admin::reset_score))
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ResetScores)
        }));

    let report_api = Router::new()
        .route("/api/admin/scores", get(routes::admin::list_scores))
        .route(
            "/api/admin/questions",
            get(routes::admin::list_course_questions),
        )
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ViewReports)
        }));

    let export_api = Router::new()
        .route("/api/admin/scores/export", get(routes::export::export_scores))
        .layer(from_fn(|req, next| {
            authorize(req, next, Capability::ExportScores)
        }));

    let app = base_routes
        .merge(public_api)
        .merge(register_api)
        .merge(portal_api)
        .merge(authoring_api)
        .merge(school_admin_api)
        .merge(classroom_admin_api)
        .merge(course_admin_api)
        .merge(window_admin_api)
        .merge(accounts_admin_api)
        .merge(score_admin_api)
        .merge(report_api)
        .merge(export_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
