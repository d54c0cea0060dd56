use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use brezora_core::errors::Error as CoreError;
use brezora_core::ErrorKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    /// A failure whose detail has already been logged and must not reach
    /// the client.
    #[error("{message}")]
    Opaque {
        kind: ErrorKind,
        message: &'static str,
    },
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::RemoteService => StatusCode::BAD_GATEWAY,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    /// Logs `err` in full and answers with `message` only.
    pub fn generic(message: &'static str) -> impl FnOnce(CoreError) -> ApiError {
        move |err| {
            tracing::error!("{}: {}", message, err);
            ApiError::Opaque {
                kind: err.kind(),
                message,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => {
                let status = status_for(e.kind());
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Request failed: {}", e);
                }
                (status, e.to_string())
            }
            ApiError::Opaque { kind, message } => (status_for(*kind), message.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
