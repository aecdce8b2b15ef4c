//! # synapse-testing
//!
//! Test infrastructure for synapse-extract development.
//!
//! Provides scripted doubles for the external collaborators (identity
//! client, tabular engine, managed table sink) plus fixture constructors,
//! so contract tests run without a network or a warehouse.
//!
//! ## Example
//!
//! ```rust,ignore
//! use synapse_auth::DeviceCodeAuth;
//! use synapse_testing::{ScriptedIdentityClient, fixtures};
//!
//! let client = ScriptedIdentityClient::new()
//!     .with_flow(fixtures::device_flow("ABC123"))
//!     .with_completion(fixtures::issued("token"));
//! let auth = DeviceCodeAuth::new(client, fixtures::identity_config());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod memory;
pub mod mock_identity;

pub use memory::{FailingEngine, MemoryEngine, MemorySink, Rows};
pub use mock_identity::ScriptedIdentityClient;
