// src/middleware.rs

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{JwtKeys, Session};

#[derive(Debug)]
pub enum SessionError {
    NoToken,
    InvalidToken,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            SessionError::NoToken => "Missing token",
            SessionError::InvalidToken => "Invalid or expired token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "id": "api.context.session_expired.app_error",
                "message": message,
                "status_code": StatusCode::UNAUTHORIZED.as_u16(),
            })),
        )
            .into_response()
    }
}

/// Middleware: проверяет JWT из `Authorization: Bearer ...` и кладёт
/// `Session` в extensions запроса
pub async fn require_session(
    State(keys): State<Arc<JwtKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, SessionError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(SessionError::NoToken)?;

    let claims = keys.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected token");
        SessionError::InvalidToken
    })?;

    request.extensions_mut().insert(Session::from(claims));
    Ok(next.run(request).await)
}
