use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::dto::course_dto::{CreateCoursePayload, DashboardResponse};
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCoursePayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let school_id = claims.school_id()?;
    let course = state.course_service.create_course(school_id, payload).await?;

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "create_course",
            "course",
            &course.id.to_string(),
            Some(json!({ "course_code": course.course_code })),
        )
        .await;

    Ok(Json(course).into_response())
}

#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let courses = state.course_service.list_courses(claims.school_id()?).await?;
    Ok(Json(courses).into_response())
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let (courses, is_instructor) = state
        .course_service
        .dashboard(claims.school_id()?, claims.account_id()?)
        .await?;
    Ok(Json(DashboardResponse {
        courses,
        is_instructor,
    })
    .into_response())
}
