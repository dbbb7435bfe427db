use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    PaymentRequired(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::Conflict(msg) => HttpError::Conflict(msg),
            AppError::InvalidCase(msg) => HttpError::Unprocessable(msg),
            err @ AppError::InsufficientBalance { .. } => {
                HttpError::PaymentRequired(err.to_string())
            }
            AppError::Internal(err) => {
                error!("internal error: {:#}", err);
                HttpError::Internal("internal error".to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            HttpError::Unauthorized => "unauthorized".to_string(),
            HttpError::BadRequest(msg) => format!("bad request: {}", msg),
            HttpError::NotFound(msg) => format!("not found: {}", msg),
            HttpError::Conflict(msg) => format!("conflict: {}", msg),
            HttpError::Unprocessable(msg) => format!("case is not openable: {}", msg),
            HttpError::PaymentRequired(msg) => msg,
            HttpError::Internal(msg) => msg,
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
