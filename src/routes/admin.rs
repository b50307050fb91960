use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{
    AssignClassroomPayload, CreateClassroomPayload, CreateExamWindowPayload, CreateSchoolPayload,
    WindowListParams,
};
use crate::dto::question_dto::CourseCodeParam;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_school(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateSchoolPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let school = state.school_service.create_school(payload).await?;

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "create_school",
            "school",
            &school.id.to_string(),
            Some(json!({ "code": school.code })),
        )
        .await;

    Ok(Json(school).into_response())
}

#[axum::debug_handler]
pub async fn list_schools(State(state): State<AppState>) -> crate::error::Result<Response> {
    Ok(Json(state.school_service.list_schools().await?).into_response())
}

#[axum::debug_handler]
pub async fn create_classroom(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateClassroomPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let classroom = state
        .school_service
        .create_classroom(claims.school_id()?, payload)
        .await?;
    Ok(Json(classroom).into_response())
}

#[axum::debug_handler]
pub async fn list_classrooms(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let classrooms = state
        .school_service
        .classrooms_for_school(claims.school_id()?)
        .await?;
    Ok(Json(classrooms).into_response())
}

#[axum::debug_handler]
pub async fn assign_classroom(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AssignClassroomPayload>,
) -> crate::error::Result<Response> {
    let account = state
        .account_service
        .assign_classroom(payload.account_id, payload.classroom_id)
        .await?;

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "assign_classroom",
            "account",
            &account.id.to_string(),
            Some(json!({ "classroom_id": payload.classroom_id })),
        )
        .await;

    Ok(Json(account).into_response())
}

#[axum::debug_handler]
pub async fn create_exam_window(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateExamWindowPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let course = state
        .course_service
        .require_course_by_code(claims.school_id()?, &payload.course_code)
        .await?;
    let window = state.period_service.create_window(course.id, payload).await?;
    Ok(Json(window).into_response())
}

#[axum::debug_handler]
pub async fn list_exam_windows(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<WindowListParams>,
) -> crate::error::Result<Response> {
    let course = state
        .course_service
        .require_course_by_code(claims.school_id()?, &params.course_code)
        .await?;
    let windows = state.period_service.windows_for_course(course.id).await?;
    Ok(Json(windows).into_response())
}

#[axum::debug_handler]
pub async fn reset_score(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(score_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let score = state.exam_service.reset_score(score_id).await?;

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "reset_score",
            "score",
            &score.id.to_string(),
            Some(json!({ "remark": score.remark })),
        )
        .await;

    Ok(Json(score).into_response())
}

#[axum::debug_handler]
pub async fn list_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let rows = state.report_service.score_rows(claims.school_id()?).await?;
    Ok(Json(rows).into_response())
}

#[axum::debug_handler]
pub async fn list_course_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<CourseCodeParam>,
) -> crate::error::Result<Response> {
    let course = state
        .course_service
        .require_course_by_code(claims.school_id()?, &params.course_code)
        .await?;
    let questions = state.report_service.list_questions(course.id).await?;
    Ok(Json(questions).into_response())
}
