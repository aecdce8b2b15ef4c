//! Token result types.

use std::time::{Duration, Instant};

/// A bearer access token with optional expiry tracking.
///
/// The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    /// Create an access token without expiry information.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: None,
        }
    }

    /// Create an access token that expires after the given duration.
    pub fn with_expiry(secret: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            secret: secret.into(),
            expires_at: Some(Instant::now() + expires_in),
        }
    }

    /// The raw token string, for embedding as a connection credential option.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }

    /// Check if the token is expiring soon (within the given duration).
    #[must_use]
    pub fn is_expiring_soon(&self, within: Duration) -> bool {
        self.expires_at
            .map(|exp| Instant::now() + within >= exp)
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Diagnostic fields of a token request the provider declined.
///
/// All fields are carried verbatim from the provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRejection {
    /// Provider error code.
    pub error: String,
    /// Human-readable description, when present.
    pub error_description: Option<String>,
    /// Correlation identifier for support escalation.
    pub correlation_id: Option<String>,
}

impl TokenRejection {
    /// Create a rejection with just an error code.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: None,
            correlation_id: None,
        }
    }
}

/// Outcome of a single token request against the identity provider.
///
/// Produced fresh per invocation and never persisted by this crate.
#[derive(Debug, Clone)]
pub enum TokenResult {
    /// The provider issued an access token.
    Issued(AccessToken),
    /// The provider declined the request.
    Rejected(TokenRejection),
}

impl TokenResult {
    /// Check whether this result carries a usable token.
    #[must_use]
    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued(_))
    }
}
