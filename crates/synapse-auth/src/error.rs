//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during token acquisition.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider rejected creation of a device-code flow.
    ///
    /// The raw provider response is kept verbatim for diagnostics; a
    /// rejected flow usually means a bad scope or client configuration.
    #[error("failed to create device flow: {response}")]
    DeviceFlowInit {
        /// Raw provider response body.
        response: String,
    },

    /// The device-code flow completed without an access token.
    ///
    /// All three diagnostic fields are propagated unmodified from the
    /// provider; the correlation id is what support escalation asks for.
    #[error("token acquisition failed: {error}{}", .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    TokenAcquisition {
        /// Provider error code (e.g. `invalid_grant`, `expired_token`).
        error: String,
        /// Human-readable description, when the provider sent one.
        description: Option<String>,
        /// Correlation identifier for support escalation.
        correlation_id: Option<String>,
    },

    /// HTTP transport failure talking to the identity provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Azure identity error.
    #[cfg(feature = "azure-identity")]
    #[error("Azure identity error: {0}")]
    AzureIdentity(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_acquisition_display_includes_description() {
        let err = AuthError::TokenAcquisition {
            error: "invalid_grant".into(),
            description: Some("token revoked".into()),
            correlation_id: Some("xyz".into()),
        };
        let text = err.to_string();
        assert!(text.contains("invalid_grant"));
        assert!(text.contains("token revoked"));
    }

    #[test]
    fn test_token_acquisition_display_without_description() {
        let err = AuthError::TokenAcquisition {
            error: "expired_token".into(),
            description: None,
            correlation_id: None,
        };
        assert_eq!(err.to_string(), "token acquisition failed: expired_token");
    }
}
