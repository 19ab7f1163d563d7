// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationError;
use crate::store::StoreError;

/// Ошибка операции сервиса. Вид ошибки определяет код ответа,
/// исходная причина сохраняется в сообщении для логов.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid or missing parameter: {0}")]
    InvalidParam(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("missing permission: {0}")]
    Forbidden(&'static str),
    /// Нет нужной функции в лицензии; содержит id сообщения операции
    #[error("license does not allow this operation ({0})")]
    NotImplemented(&'static str),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AppError::NotFound(what),
            StoreError::Conflict(what) => AppError::Conflict(what),
            StoreError::Unavailable(cause) => AppError::StoreUnavailable(cause),
        }
    }
}

impl AppError {
    pub fn invalid_param(name: &str) -> Self {
        AppError::InvalidParam(name.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidParam(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Стабильный id сообщения для клиента
    pub fn id(&self) -> &'static str {
        match self {
            AppError::InvalidParam(_) => "api.context.invalid_param.app_error",
            AppError::Validation(e) => e.message_id(),
            AppError::Forbidden(_) => "api.context.permissions.app_error",
            AppError::NotImplemented(id) => *id,
            AppError::NotFound(_) => "app.group.not_found.app_error",
            AppError::Conflict(_) => "app.group.unique_constraint.app_error",
            AppError::StoreUnavailable(_) => "app.group.store_unavailable.app_error",
        }
    }

    /// Повторять имеет смысл только сбои хранилища
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!(error = %self, "request failed");
        }

        // Подробности сбоя хранилища наружу не отдаём
        let message = match &self {
            AppError::StoreUnavailable(_) => "store unavailable".to_string(),
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "id": self.id(),
                "message": message,
                "status_code": status.as_u16(),
            })),
        )
            .into_response()
    }
}
