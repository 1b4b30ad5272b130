//! Generation-specific error type wrapping reqwest errors.

use autoflow_domain::error::AutoflowError;

use crate::schema::SchemaViolation;

/// Errors originating from the HTTP generation adapter.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Sending the request or reading the response failed.
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no message content.
    #[error("response has no content")]
    EmptyResponse,

    /// The message content is not valid JSON.
    #[error("response content is not JSON")]
    Json(#[from] serde_json::Error),

    /// The object does not satisfy the declared schema.
    #[error("response does not match schema {schema}")]
    Schema {
        schema: &'static str,
        #[source]
        violation: SchemaViolation,
    },
}

impl From<GenerationError> for AutoflowError {
    fn from(err: GenerationError) -> Self {
        Self::Generation(Box::new(err))
    }
}
