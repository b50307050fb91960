use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::dto::question_dto::{
    CourseCodeParam, CreateBackgroundPayload, CreateQuestionPayload, QuestionIdParam,
    UpdateQuestionPayload,
};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::services::question_service::Author;
use crate::AppState;

fn author_from(claims: &Claims) -> crate::error::Result<Author> {
    Ok(Author {
        account_id: claims.account_id()?,
        school_id: claims.school_id()?,
        role: claims.role().ok_or_else(|| {
            Error::Forbidden("You do not have permission to perform this action".to_string())
        })?,
    })
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuestionPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let author = author_from(&claims)?;
    let question = state.question_service.create_question(author, payload).await?;
    Ok(Json(question).into_response())
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<QuestionIdParam>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let author = author_from(&claims)?;
    let question = state
        .question_service
        .update_question(author, params.id, payload)
        .await?;
    Ok(Json(question).into_response())
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<QuestionIdParam>,
) -> crate::error::Result<Response> {
    let author = author_from(&claims)?;
    state.question_service.delete_question(author, params.id).await?;

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "delete_question",
            "question",
            &params.id.to_string(),
            None,
        )
        .await;

    Ok(Json(json!({ "deleted": true, "id": params.id })).into_response())
}

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<CourseCodeParam>,
) -> crate::error::Result<Response> {
    let author = author_from(&claims)?;
    let questions = state
        .question_service
        .list_questions(author, &params.course_code)
        .await?;
    Ok(Json(questions).into_response())
}

#[axum::debug_handler]
pub async fn create_background(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBackgroundPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let author = author_from(&claims)?;
    let background = state
        .question_service
        .create_background(author, payload)
        .await?;
    Ok(Json(background).into_response())
}
