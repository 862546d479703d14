use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // 400
    #[error("{0}")]
    Validation(String),

    // 401
    #[error("{0}")]
    Unauthorized(String),

    // 403
    #[error("{0}")]
    Forbidden(String),

    // 404
    #[error("{0}")]
    NotFound(String),

    // 409
    #[error("{0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => {
                log::error!("Database error: {:?}", e);
                HttpResponse::InternalServerError().json(json!({"error": "Internal server error"}))
            }
            ApiError::Internal(e) => {
                log::error!("Internal error: {:?}", e);
                HttpResponse::InternalServerError().json(json!({"error": "Internal server error"}))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()})),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
