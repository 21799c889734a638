//! Mapping of crate errors to HTTP responses.

use crate::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error returned from a handler, rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Returns the HTTP status for the wrapped error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::ItemNotFound(_) | Error::MalformedUpdate(_) | Error::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            },
            Error::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the client-facing message.
    ///
    /// A malformed update echoes the parser message; internal causes are
    /// never exposed.
    #[must_use]
    pub fn message(&self) -> &str {
        match &self.0 {
            Error::InvalidInput(_) => "Invalid input data",
            Error::ItemNotFound(_) => "Item not found",
            Error::MalformedUpdate(cause) => cause.as_str(),
            Error::RouteNotFound { .. } => "Route not found",
            Error::OperationFailed { .. } => "Internal server error",
        }
    }

    const fn kind(&self) -> &'static str {
        match self.0 {
            Error::InvalidInput(_) => "invalid_input",
            Error::ItemNotFound(_) => "item_not_found",
            Error::MalformedUpdate(_) => "malformed_update",
            Error::RouteNotFound { .. } => "route_not_found",
            Error::OperationFailed { .. } => "operation_failed",
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            Error::RouteNotFound { method, target } => {
                tracing::warn!(%method, %target, "Route not found");
            },
            err => tracing::error!(error = %err, "Request failed"),
        }
        metrics::counter!("grocery_errors_total", "kind" => self.kind()).increment(1);

        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(Error::InvalidInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(Error::ItemNotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::MalformedUpdate("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::RouteNotFound {
                method: "GET".into(),
                target: "/".into()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::operation("write_list_file", "denied")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_hides_cause() {
        let err = ApiError(Error::operation("write_list_file", "/secret/path: denied"));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_malformed_update_echoes_parser_message() {
        let err = ApiError(Error::MalformedUpdate("expected value at line 1 column 1".into()));
        assert_eq!(err.message(), "expected value at line 1 column 1");
    }
}
