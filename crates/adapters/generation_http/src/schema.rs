//! Check generated objects against the JSON Schema the invoker declared.

use serde_json::Value;

/// First place where a value breaks its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at {path}: {message}")]
pub struct SchemaViolation {
    /// JSON pointer into the checked value, `/` for the root.
    pub path: String,
    pub message: String,
}

/// Check `value` against `schema`.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] reported by the validator, or one
/// located at `/` when the schema itself does not compile.
pub fn check(schema: &Value, value: &Value) -> Result<(), SchemaViolation> {
    let validator = jsonschema::validator_for(schema).map_err(|err| SchemaViolation {
        path: "/".to_string(),
        message: format!("invalid schema: {err}"),
    })?;

    match validator.iter_errors(value).next() {
        None => Ok(()),
        Some(err) => {
            let path = err.instance_path.to_string();
            Err(SchemaViolation {
                path: if path.is_empty() { "/".to_string() } else { path },
                message: err.to_string(),
            })
        }
    }
}
