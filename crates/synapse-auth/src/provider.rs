//! The token-acquisition core: silent reuse with device-code fallback.

use crate::client::IdentityClient;
use crate::config::IdentityConfig;
use crate::error::AuthError;
use crate::flow::DeviceCodeInstructions;
use crate::public_client::PublicClientApplication;
use crate::token::{AccessToken, TokenResult};

/// Interactive token provider over any [`IdentityClient`].
///
/// Tries silent reuse of a cached account session, falls back to a
/// device-code exchange. One silent attempt, then one interactive attempt;
/// re-running the whole flow is the caller's call.
///
/// # Example
///
/// ```rust,ignore
/// use synapse_auth::{DeviceCodeAuth, IdentityConfig};
///
/// let config = IdentityConfig::for_azure_sql(client_id, tenant_id);
/// let auth = DeviceCodeAuth::public(config)?;
/// let token = auth
///     .acquire_token(|instructions| println!("{instructions}"))
///     .await?;
/// ```
#[derive(Debug)]
pub struct DeviceCodeAuth<C> {
    client: C,
    config: IdentityConfig,
}

impl DeviceCodeAuth<PublicClientApplication> {
    /// Build a provider backed by the bundled HTTP public client.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is incomplete or the HTTP client cannot
    /// be constructed.
    pub fn public(config: IdentityConfig) -> Result<Self, AuthError> {
        let client = PublicClientApplication::new(config.clone())?;
        Ok(Self { client, config })
    }
}

impl<C: IdentityClient> DeviceCodeAuth<C> {
    /// Build a provider over an explicit identity client.
    pub fn new(client: C, config: IdentityConfig) -> Self {
        Self { client, config }
    }

    /// The identity client backing this provider.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The identity configuration in effect.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Acquire an access token for the configured scope.
    ///
    /// Silent acquisition is attempted against the first cached account, if
    /// any. When nothing usable comes back, a device-code flow is started:
    /// `on_instructions` receives the sign-in instructions exactly once,
    /// then the call blocks polling the provider until the flow completes,
    /// expires, or is denied.
    ///
    /// # Errors
    ///
    /// - [`AuthError::DeviceFlowInit`] when the provider rejects flow
    ///   creation (the descriptor carries no user code).
    /// - [`AuthError::TokenAcquisition`] when the flow completes without an
    ///   access token; `error`, `description`, and `correlation_id` are
    ///   propagated unmodified.
    /// - [`AuthError::Transport`] for HTTP failures.
    pub async fn acquire_token<F>(&self, mut on_instructions: F) -> Result<AccessToken, AuthError>
    where
        F: FnMut(&DeviceCodeInstructions),
    {
        let scope = self.config.scope.as_str();

        let mut result = None;
        if let Some(account) = self.client.cached_accounts().into_iter().next() {
            tracing::debug!(username = account.username.as_str(), "trying cached account");
            result = self.client.acquire_token_silent(scope, &account).await;
        }

        let result = match result {
            Some(result) => result,
            None => {
                let flow = self.client.initiate_device_flow(scope).await?;
                let instructions =
                    flow.instructions()
                        .ok_or_else(|| AuthError::DeviceFlowInit {
                            response: flow.raw().to_string(),
                        })?;
                tracing::debug!(user_code = instructions.user_code.as_str(), "device flow started");
                on_instructions(&instructions);
                self.client.complete_device_flow(&flow).await?
            }
        };

        match result {
            TokenResult::Issued(token) => {
                tracing::info!("access token acquired");
                Ok(token)
            }
            TokenResult::Rejected(rejection) => Err(AuthError::TokenAcquisition {
                error: rejection.error,
                description: rejection.error_description,
                correlation_id: rejection.correlation_id,
            }),
        }
    }
}
