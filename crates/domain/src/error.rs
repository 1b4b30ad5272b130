//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutoflowError`] via `From`. Adapter errors are boxed so the domain
//! never depends on `sqlx`, `reqwest` or any other IO crate.

/// Boxed error coming from an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error shared by the domain, application and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum AutoflowError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] BoxError),

    #[error("generation service error")]
    Generation(#[source] BoxError),

    /// The generation service answered with an object that does not match
    /// the shape the invoker expected.
    #[error("generation output does not match the expected shape")]
    InvalidOutput(#[source] serde_json::Error),

    /// A route handed an invoker an event of the wrong kind.
    #[error("invoker {invoker} cannot handle a {event} event")]
    EventMismatch {
        invoker: &'static str,
        event: &'static str,
    },
}

impl AutoflowError {
    /// Render the error together with every source in its chain, separated
    /// by `": "`.
    ///
    /// Used for `error_message` on failed executions, where the top-level
    /// message alone ("storage error") would hide the cause.
    #[must_use]
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: usize },

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
