use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("blog not found: {0}")]
    PostNotFound(Uuid),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The Internal detail stays in the logs; clients only see a generic
        // message.
        let (message, details) = match self {
            DomainError::PostNotFound(id) => ("blog not found", Some(json!({ "id": id }))),
            DomainError::Unauthorized => ("unauthorized", None),
            DomainError::Internal(_) => ("internal server error", None),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { message, details })
    }
}
