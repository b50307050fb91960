use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::account::{Capability, Role};
use crate::AppState;

pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has timed out. Kindly re-enter your details to login!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: String,
    pub school_id: String,
}

impl Claims {
    pub fn account_id(&self) -> Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| Error::Unauthorized(SESSION_EXPIRED_MESSAGE.to_string()))
    }

    pub fn school_id(&self) -> Result<Uuid> {
        self.school_id
            .parse()
            .map_err(|_| Error::Unauthorized(SESSION_EXPIRED_MESSAGE.to_string()))
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

fn login_redirect() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": SESSION_EXPIRED_MESSAGE,
            "redirect_to": "/login",
        })),
    )
        .into_response()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "You do not have permission to perform this action",
            "redirect_to": "/dashboard",
        })),
    )
        .into_response()
}

fn decode_session(req: &Request) -> std::result::Result<Claims, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(login_redirect());
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(login_redirect());
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(login_redirect());
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| login_redirect())
}

/// Any valid session may pass; the claims are attached for handlers.
pub async fn require_session(mut req: Request, next: Next) -> Response {
    match decode_session(&req) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

/// Valid session holding the given capability. Insufficient role is a
/// flash-and-redirect 403, never a silent downgrade.
pub async fn authorize(mut req: Request, next: Next, cap: Capability) -> Response {
    match decode_session(&req) {
        Ok(claims) => {
            let Some(role) = claims.role() else {
                return forbidden();
            };
            if !role.can(cap) {
                return forbidden();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

/// Registration gate: admin-only once an Admin account exists, open on first
/// boot so the portal can be bootstrapped.
pub async fn require_admin_or_bootstrap(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let admin_exists = match state.account_service.admin_exists().await {
        Ok(exists) => exists,
        Err(e) => return e.into_response(),
    };

    if !admin_exists {
        return next.run(req).await;
    }

    match decode_session(&req) {
        Ok(claims) => {
            let Some(role) = claims.role() else {
                return forbidden();
            };
            if !role.can(Capability::ManageAccounts) {
                return forbidden();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}
