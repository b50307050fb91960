use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;

use crate::dto::exam_dto::{SubmitExamRequest, SubmitExamResponse};
use crate::middleware::auth::Claims;
use crate::services::exam_service::ExamEntry;
use crate::utils::time::today;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_paper(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_code): Path<String>,
) -> crate::error::Result<Response> {
    let account_id = claims.account_id()?;
    let school_id = claims.school_id()?;
    let class_grade = state.account_service.class_grade_of(account_id).await?;

    match state
        .exam_service
        .open_paper(account_id, school_id, &course_code, class_grade, today())
        .await?
    {
        ExamEntry::Paper(paper) => Ok(Json(paper).into_response()),
        ExamEntry::AlreadyPassed { course_code } => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_passed",
                "message": "You have already passed this course",
                "redirect_to": format!("/result?course_code={}", course_code),
            })),
        )
            .into_response()),
    }
}

#[axum::debug_handler]
pub async fn submit_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_code): Path<String>,
    Json(req): Json<SubmitExamRequest>,
) -> crate::error::Result<Response> {
    let account_id = claims.account_id()?;
    let school_id = claims.school_id()?;
    let class_grade = state.account_service.class_grade_of(account_id).await?;

    let outcome = state
        .exam_service
        .submit_paper(account_id, school_id, &course_code, class_grade, today(), req)
        .await?;

    tracing::info!(
        account_id = %account_id,
        course_code = %course_code,
        score = outcome.percentage,
        remark = outcome.remark.as_str(),
        "exam graded"
    );

    let _ = state
        .audit_service
        .log(
            Some(account_id),
            "submit_exam",
            "score",
            &outcome.score_id.to_string(),
            Some(json!({
                "correct": outcome.correct_count,
                "total": outcome.total_questions,
                "percentage": outcome.percentage,
                "remark": outcome.remark.as_str(),
            })),
        )
        .await;

    Ok(Json(SubmitExamResponse {
        score_id: outcome.score_id,
        correct_count: outcome.correct_count,
        total_questions: outcome.total_questions,
        percentage: outcome.percentage,
        remark: outcome.remark.as_str().to_string(),
        message: "Exam submitted and graded.".to_string(),
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_code): Path<String>,
) -> crate::error::Result<Response> {
    let verdict = state
        .exam_service
        .verdict(claims.account_id()?, claims.school_id()?, &course_code)
        .await?;
    Ok(Json(verdict).into_response())
}
