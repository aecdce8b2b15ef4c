//! Identity configuration.

use crate::error::AuthError;

/// Default scope for Azure SQL / Synapse token requests.
pub const AZURE_SQL_SCOPE: &str = "https://database.windows.net/.default";

/// Identity provider configuration for one public-client application.
///
/// Immutable per run. All derived URLs are computed from the tenant, so a
/// config never mixes authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// OAuth public client (application) identifier.
    pub client_id: String,
    /// Identity provider tenant identifier.
    pub tenant_id: String,
    /// Requested OAuth scope URI.
    pub scope: String,
}

impl IdentityConfig {
    /// Create a new identity configuration.
    pub fn new(
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            scope: scope.into(),
        }
    }

    /// Create a configuration scoped for Azure SQL / Synapse access.
    pub fn for_azure_sql(client_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self::new(client_id, tenant_id, AZURE_SQL_SCOPE)
    }

    /// Validate that all required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] naming the first empty field.
    pub fn validate(&self) -> Result<(), AuthError> {
        for (name, value) in [
            ("client_id", &self.client_id),
            ("tenant_id", &self.tenant_id),
            ("scope", &self.scope),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::Configuration(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// The tenant authority URL.
    #[must_use]
    pub fn authority_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }

    /// The v2.0 device-authorization endpoint for this tenant.
    #[must_use]
    pub fn device_authorization_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/devicecode", self.authority_url())
    }

    /// The v2.0 token endpoint for this tenant.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority_url())
    }
}
