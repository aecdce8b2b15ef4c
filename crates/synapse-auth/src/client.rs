//! The identity-client seam.

use crate::error::AuthError;
use crate::flow::DeviceCodeFlow;
use crate::token::TokenResult;

/// A previously authenticated account held in the identity client's cache.
///
/// Opaque to token acquisition: the provider only asks "is there one" and
/// hands it back for silent refresh. Session secrets stay inside the
/// identity client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account display identifier (usually a UPN).
    pub username: String,
}

impl Account {
    /// Create an account handle.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Operations this crate consumes from an OAuth public-client library.
///
/// [`crate::PublicClientApplication`] is the production implementation;
/// tests substitute scripted doubles so the acquisition core can be
/// exercised without a network.
#[allow(async_fn_in_trait)]
pub trait IdentityClient: Send + Sync {
    /// Accounts with a cached session, in the client's own order.
    fn cached_accounts(&self) -> Vec<Account>;

    /// Try to acquire a token for `scope` without user interaction.
    ///
    /// Returns `None` when nothing usable came back. An expired refresh
    /// token, revoked consent, or a transport failure all look the same to
    /// the caller, which falls through to the interactive flow.
    async fn acquire_token_silent(&self, scope: &str, account: &Account) -> Option<TokenResult>;

    /// Request a device-authorization flow descriptor for `scope`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors; a provider-side rejection is returned as
    /// a descriptor without a user code, raw response attached.
    async fn initiate_device_flow(&self, scope: &str) -> Result<DeviceCodeFlow, AuthError>;

    /// Block until the device-code flow completes, expires, or is denied.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or an unusable flow descriptor; a
    /// provider-side denial is a `Rejected` result, not an error.
    async fn complete_device_flow(&self, flow: &DeviceCodeFlow) -> Result<TokenResult, AuthError>;
}
