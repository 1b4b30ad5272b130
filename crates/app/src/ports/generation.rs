//! Generation service port — structured output from a language model.

use std::future::Future;
use std::sync::Arc;

use autoflow_domain::error::AutoflowError;

/// A prompt together with the JSON schema the answer must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Short identifier for the schema (e.g. `"categorize"`).
    pub schema_name: &'static str,
    pub prompt: String,
    /// JSON Schema describing the expected object.
    pub schema: serde_json::Value,
}

/// External completion endpoint returning schema-constrained objects.
///
/// Implementations must either return an object conforming to
/// [`GenerationRequest::schema`] or fail; they never hand back malformed data.
pub trait GenerationService {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<serde_json::Value, AutoflowError>> + Send;
}

impl<T: GenerationService + Send + Sync> GenerationService for Arc<T> {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<serde_json::Value, AutoflowError>> + Send {
        (**self).generate(request)
    }
}
