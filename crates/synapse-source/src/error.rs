//! Orchestration error types.

use thiserror::Error;

/// Errors that can occur while loading or persisting warehouse data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The connection descriptor could not be built.
    #[error("invalid connection descriptor: {0}")]
    Descriptor(String),

    /// Token acquisition failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] synapse_auth::AuthError),

    /// The external connector failed; its error is propagated verbatim.
    #[error("connector error: {0}")]
    Connector(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    /// Wrap an external engine or sink error.
    pub fn connector(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Connector(err.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_error_preserves_message() {
        let err = SourceError::connector("spark job aborted");
        assert_eq!(err.to_string(), "connector error: spark job aborted");
    }
}
