//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use autoflow_domain::error::{AutoflowError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub(crate) fn response(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                error: message.into(),
            }),
        )
            .into_response()
    }
}

/// Maps [`AutoflowError`] and rejected request bodies to an HTTP response
/// with the matching status code and an [`ErrorBody`].
pub enum ApiError {
    Domain(AutoflowError),
    /// The body was not JSON or did not fit the request type.
    Body(JsonRejection),
}

impl From<AutoflowError> for ApiError {
    fn from(err: AutoflowError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Domain(err) => err,
            Self::Body(rejection) => {
                return ErrorBody::response(rejection.status(), rejection.body_text());
            }
        };
        match &err {
            AutoflowError::Validation(err) => {
                ErrorBody::response(StatusCode::BAD_REQUEST, err.to_string())
            }
            AutoflowError::NotFound(err) => {
                ErrorBody::response(StatusCode::NOT_FOUND, err.to_string())
            }
            AutoflowError::Storage(_)
            | AutoflowError::Generation(_)
            | AutoflowError::InvalidOutput(_)
            | AutoflowError::EventMismatch { .. } => {
                tracing::error!(error = %err.chain_message(), "request failed");
                ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoflow_domain::error::NotFoundError;

    #[test]
    fn should_map_validation_to_bad_request() {
        let response = ApiError::from(ValidationError::EmptyName).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let err: AutoflowError = NotFoundError {
            entity: "AutomationRule",
            id: "x".to_string(),
        }
        .into();
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_hide_storage_details() {
        let err = AutoflowError::Storage("disk full".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
