//! Unattended token acquisition for scheduled runs.
//!
//! The interactive device-code flow needs a human; scheduled extractions do
//! not have one. These providers acquire tokens for the same scope through
//! the `azure_identity` credential types instead:
//!
//! - **Service Principal**: application credentials (client id + secret)
//! - **Managed Identity**: Azure VM/App Service/Container/AKS identity
//!
//! Both produce the same [`AccessToken`] the interactive provider does, so
//! the extraction pipeline is indifferent to how the token was obtained.
//!
//! ## Example
//!
//! ```rust,ignore
//! use synapse_auth::{IdentityConfig, ServicePrincipalAuth};
//!
//! let config = IdentityConfig::for_azure_sql(client_id, tenant_id);
//! let auth = ServicePrincipalAuth::new(&config, client_secret)?;
//! let token = auth.acquire_token().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use azure_core::credentials::TokenCredential;
use azure_identity::{
    ClientSecretCredential, ManagedIdentityCredential, ManagedIdentityCredentialOptions,
    UserAssignedId,
};

use crate::config::IdentityConfig;
use crate::error::AuthError;
use crate::token::AccessToken;

/// Service Principal token provider for unattended runs.
pub struct ServicePrincipalAuth {
    credential: Arc<ClientSecretCredential>,
    scope: String,
}

impl ServicePrincipalAuth {
    /// Create a Service Principal provider for the configured identity.
    ///
    /// The tenant, client id, and scope come from `config`; only the secret
    /// is supplied separately so configurations stay free of credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be created.
    pub fn new(
        config: &IdentityConfig,
        client_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        use azure_core::credentials::Secret;

        config.validate()?;
        let secret = Secret::new(client_secret.into());
        let credential = ClientSecretCredential::new(
            config.tenant_id.as_str(),
            config.client_id.clone(),
            secret,
            None,
        )
        .map_err(|e| AuthError::AzureIdentity(e.to_string()))?;
        Ok(Self {
            credential,
            scope: config.scope.clone(),
        })
    }

    /// Acquire an access token for the configured scope.
    ///
    /// # Errors
    ///
    /// Returns an error if token acquisition fails.
    pub async fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        acquire(self.credential.as_ref(), &self.scope).await
    }
}

impl Clone for ServicePrincipalAuth {
    fn clone(&self) -> Self {
        Self {
            credential: Arc::clone(&self.credential),
            scope: self.scope.clone(),
        }
    }
}

impl std::fmt::Debug for ServicePrincipalAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipalAuth")
            .field("credential", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Managed Identity token provider for code running on Azure resources.
#[derive(Clone)]
pub struct ManagedIdentityAuth {
    credential: Arc<ManagedIdentityCredential>,
    scope: String,
}

impl ManagedIdentityAuth {
    /// Use the system-assigned identity of the hosting Azure resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the managed identity credential cannot be created.
    pub fn system_assigned(scope: impl Into<String>) -> Result<Self, AuthError> {
        let credential = ManagedIdentityCredential::new(None)
            .map_err(|e| AuthError::AzureIdentity(e.to_string()))?;
        Ok(Self {
            credential,
            scope: scope.into(),
        })
    }

    /// Use a user-assigned managed identity selected by client ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the managed identity credential cannot be created.
    pub fn user_assigned_client_id(
        client_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let options = ManagedIdentityCredentialOptions {
            user_assigned_id: Some(UserAssignedId::ClientId(client_id.into())),
            ..Default::default()
        };
        let credential = ManagedIdentityCredential::new(Some(options))
            .map_err(|e| AuthError::AzureIdentity(e.to_string()))?;
        Ok(Self {
            credential,
            scope: scope.into(),
        })
    }

    /// Acquire an access token for the configured scope.
    ///
    /// # Errors
    ///
    /// Returns an error if token acquisition fails.
    pub async fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        acquire(self.credential.as_ref(), &self.scope).await
    }
}

impl std::fmt::Debug for ManagedIdentityAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedIdentityAuth")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

async fn acquire(
    credential: &dyn TokenCredential,
    scope: &str,
) -> Result<AccessToken, AuthError> {
    let token = credential
        .get_token(&[scope], None)
        .await
        .map_err(|e| AuthError::AzureIdentity(e.to_string()))?;

    let now = time::OffsetDateTime::now_utc();
    let secret = token.token.secret().to_string();
    if token.expires_on > now {
        let diff = token.expires_on - now;
        let expires_in = Duration::from_secs(diff.whole_seconds().max(0) as u64);
        Ok(AccessToken::with_expiry(secret, expires_in))
    } else {
        Ok(AccessToken::new(secret))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // These need live Azure credentials in the environment; run manually:
    // cargo test --features azure-identity -- --ignored

    #[tokio::test]
    #[ignore = "Requires Azure Service Principal credentials"]
    async fn test_service_principal_acquires_token() {
        let tenant_id = std::env::var("AZURE_TENANT_ID").expect("AZURE_TENANT_ID not set");
        let client_id = std::env::var("AZURE_CLIENT_ID").expect("AZURE_CLIENT_ID not set");
        let client_secret =
            std::env::var("AZURE_CLIENT_SECRET").expect("AZURE_CLIENT_SECRET not set");

        let config = IdentityConfig::for_azure_sql(client_id, tenant_id);
        let auth =
            ServicePrincipalAuth::new(&config, client_secret).expect("failed to create credential");
        let token = auth.acquire_token().await.expect("failed to get token");
        assert!(!token.secret().is_empty());
    }

    #[tokio::test]
    #[ignore = "Requires Azure Managed Identity environment"]
    async fn test_managed_identity_acquires_token() {
        let auth = ManagedIdentityAuth::system_assigned(crate::config::AZURE_SQL_SCOPE)
            .expect("failed to create credential");
        let token = auth.acquire_token().await.expect("failed to get token");
        assert!(!token.secret().is_empty());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = IdentityConfig::for_azure_sql("client", "tenant");
        if let Ok(auth) = ServicePrincipalAuth::new(&config, "super-secret") {
            let debug = format!("{auth:?}");
            assert!(!debug.contains("super-secret"));
            assert!(debug.contains("[REDACTED]"));
        }
    }
}
