//! Mapping from store outcomes and uncaught faults to HTTP responses.
//!
//! Every error body has the shape `{"error": "..."}`; uncaught faults add a
//! `message` whose detail depends on [`Config::expose_error_details`].
//!
//! [`Config::expose_error_details`]: crate::config::Config::expose_error_details

use std::any::Any;
use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use todo_shared::ErrorBody;

use crate::store::StoreError;

pub const TODO_NOT_FOUND: &str = "Todo not found";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const UNCAUGHT_FAULT: &str = "Something went wrong!";
const GENERIC_FAULT_DETAIL: &str = "Internal server error";

/// Error returned by request handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Logged on 5xx, never sent to the client.
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn todo_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, TODO_NOT_FOUND)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a store outcome for one operation. `fault` is the body used when
    /// the store itself failed, e.g. "Failed to fetch todos".
    pub fn from_store(err: StoreError, fault: &'static str) -> Self {
        match err {
            StoreError::Validation(invalid) => Self::bad_request(invalid.to_string()),
            StoreError::NotFound => Self::todo_not_found(),
            other => Self::internal(fault).with_source(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = %source,
                    "request failed"
                ),
                None => tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "request failed"
                ),
            }
        }

        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

pub async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(ROUTE_NOT_FOUND)))
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    let body = ErrorBody {
        error: UNCAUGHT_FAULT.to_string(),
        message: Some(if expose_details {
            detail
        } else {
            GENERIC_FAULT_DETAIL.to_string()
        }),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_shared::ValidationError;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let invalid = ApiError::from_store(
            StoreError::Validation(ValidationError::TitleRequired),
            "Failed to create todo",
        );
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "Title is required");

        let missing = ApiError::from_store(StoreError::NotFound, "Failed to update todo");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.message(), TODO_NOT_FOUND);

        let redis = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let fault = ApiError::from_store(StoreError::Redis(redis), "Failed to fetch todos");
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fault.message(), "Failed to fetch todos");
        assert!(std::error::Error::source(&fault).is_some());
    }

    #[tokio::test]
    async fn error_body_carries_only_the_message() {
        let redis = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let response =
            ApiError::from_store(StoreError::Redis(redis), "Failed to delete todo").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, ErrorBody::new("Failed to delete todo"));
    }

    #[tokio::test]
    async fn panic_detail_is_gated() {
        let hidden = panic_response(Box::new("boom"), false);
        assert_eq!(hidden.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(hidden).await;
        assert_eq!(body.error, UNCAUGHT_FAULT);
        assert_eq!(body.message.as_deref(), Some(GENERIC_FAULT_DETAIL));

        let shown = panic_response(Box::new(String::from("boom")), true);
        let body = body_of(shown).await;
        assert_eq!(body.error, UNCAUGHT_FAULT);
        assert_eq!(body.message.as_deref(), Some("boom"));
    }
}
