use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::dto::auth_dto::{
    AccountSummary, EntranceLoginRequest, EntranceRegisterRequest, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse,
};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::models::account::{Account, Role};
use crate::services::account_service::NewAccount;
use crate::utils::credentials::entrance_username;
use crate::AppState;

fn login_response(state: &AppState, account: Account) -> crate::error::Result<LoginResponse> {
    let token = state.account_service.issue_token(&account)?;
    Ok(LoginResponse {
        token,
        account: AccountSummary {
            id: account.id,
            username: account.username,
            surname: account.surname,
            first_name: account.first_name,
            role: account.role,
            school_id: account.school_id,
        },
    })
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let account = state
        .account_service
        .authenticate(&req.username, &req.passcode)
        .await?;
    Ok(Json(login_response(&state, account)?).into_response())
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<RegisterRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let role = Role::parse(&req.role)
        .ok_or_else(|| Error::BadRequest(format!("Unknown role '{}'", req.role)))?;

    let school = match state.school_service.school_by_code(&req.school_code).await? {
        Some(school) => school,
        None => {
            // First boot only: the first admin brings their school with them.
            if state.account_service.admin_exists().await? {
                return Err(Error::NotFound("School not found".to_string()));
            }
            state
                .school_service
                .create_school(crate::dto::admin_dto::CreateSchoolPayload {
                    code: req.school_code.clone(),
                    name: req.school_name.clone().unwrap_or_else(|| req.school_code.clone()),
                })
                .await?
        }
    };

    let registered = state
        .account_service
        .register(
            &school,
            NewAccount {
                surname: req.surname,
                first_name: req.first_name,
                role,
                email: req.email,
            },
        )
        .await?;

    // Mail dispatch must never fail the registration.
    if let Err(e) = state
        .notification_service
        .enqueue_account_created(&registered.account, &registered.passcode)
        .await
    {
        tracing::error!(error = ?e, "Failed to enqueue account-created mail");
    }

    let actor = claims.as_ref().and_then(|c| c.account_id().ok());
    let _ = state
        .audit_service
        .log(
            actor,
            "register_account",
            "account",
            &registered.account.id.to_string(),
            Some(json!({ "username": registered.account.username, "role": registered.account.role })),
        )
        .await;

    Ok(Json(RegisterResponse {
        account_id: registered.account.id,
        username: registered.account.username,
        role: registered.account.role,
        message: "Account created. Login details have been sent by email.".to_string(),
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn entrance_login(
    State(state): State<AppState>,
    Path(school_code): Path<String>,
    Json(req): Json<EntranceLoginRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let school = state
        .school_service
        .require_school_by_code(&school_code)
        .await?;
    let username = entrance_username(&school.code, &req.exam_number);
    let account = state
        .account_service
        .authenticate(&username, &req.passcode)
        .await?;
    Ok(Json(login_response(&state, account)?).into_response())
}

#[axum::debug_handler]
pub async fn register_prospective(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(school_code): Path<String>,
    Json(req): Json<EntranceRegisterRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let school = state
        .school_service
        .require_school_by_code(&school_code)
        .await?;
    let registered = state
        .account_service
        .register_prospective(&school, &req.surname, &req.first_name, &req.exam_number, req.email)
        .await?;

    if let Err(e) = state
        .notification_service
        .enqueue_account_created(&registered.account, &registered.passcode)
        .await
    {
        tracing::error!(error = ?e, "Failed to enqueue account-created mail");
    }

    let _ = state
        .audit_service
        .log(
            claims.account_id().ok(),
            "register_prospective",
            "account",
            &registered.account.id.to_string(),
            Some(json!({ "school": school.code, "exam_number": registered.account.exam_number })),
        )
        .await;

    Ok(Json(RegisterResponse {
        account_id: registered.account.id,
        username: registered.account.username,
        role: registered.account.role,
        message: "Candidate registered. Login details have been sent by email.".to_string(),
    })
    .into_response())
}
