//! # synapse-auth
//!
//! Entra ID token acquisition for interactive Azure Synapse access.
//!
//! The core is a silent-then-interactive acquisition routine over an OAuth
//! public-client application: reuse a cached account session when one can be
//! silently refreshed, otherwise walk the user through a device-code flow.
//!
//! ## Token sources
//!
//! | Source | Feature flag | Description |
//! |--------|--------------|-------------|
//! | Device code | default | Interactive sign-in on a second device |
//! | Silent refresh | default | Cached account session reuse |
//! | Service Principal | `azure-identity` | App credentials, unattended |
//! | Managed Identity | `azure-identity` | VM/container identity, unattended |
//!
//! ## Example
//!
//! ```rust,ignore
//! use synapse_auth::{DeviceCodeAuth, IdentityConfig};
//!
//! let config = IdentityConfig::for_azure_sql("app-client-id", "tenant-id");
//! let auth = DeviceCodeAuth::public(config)?;
//! let token = auth
//!     .acquire_token(|instructions| println!("{instructions}"))
//!     .await?;
//! println!("token acquired, expires soon: {}", token.is_expiring_soon(std::time::Duration::from_secs(300)));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod flow;
#[cfg(feature = "azure-identity")]
pub mod headless;
pub mod provider;
pub mod public_client;
pub mod token;

pub use client::{Account, IdentityClient};
pub use config::{AZURE_SQL_SCOPE, IdentityConfig};
pub use error::AuthError;
pub use flow::{DeviceCodeFlow, DeviceCodeInstructions};
#[cfg(feature = "azure-identity")]
pub use headless::{ManagedIdentityAuth, ServicePrincipalAuth};
pub use provider::DeviceCodeAuth;
pub use public_client::PublicClientApplication;
pub use token::{AccessToken, TokenRejection, TokenResult};
