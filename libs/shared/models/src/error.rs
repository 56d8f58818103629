use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Request-scoped error taxonomy. Every non-2xx response carries a body of
/// the shape `{code, message, details}`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Conflict: {message}")]
    Conflict { message: String, details: Option<Value> },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        AppError::Conflict {
            message: message.into(),
            details: Some(details),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> String {
        match self {
            AppError::NotFound(_) => "NOT_FOUND".to_string(),
            AppError::Validation(_) => "VALIDATION_ERROR".to_string(),
            AppError::Unprocessable(_) => "UNPROCESSABLE_ENTITY".to_string(),
            AppError::Conflict { .. } => "CONFLICT_ERROR".to_string(),
            _ => format!("ERROR_{}", self.status().as_u16()),
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Unprocessable(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg,
            AppError::Conflict { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            AppError::Conflict { details, .. } => details.clone().unwrap_or(Value::Null),
            _ => Value::Null,
        };

        tracing::error!("Error: {}: {}", status, self.message());

        let body = Json(json!({
            "code": self.code(),
            "message": self.message(),
            "details": details,
        }));

        (status, body).into_response()
    }
}
