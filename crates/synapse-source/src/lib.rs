//! # synapse-source
//!
//! Extraction orchestration for Azure Synapse dedicated pools.
//!
//! This crate owns the glue between a bearer token and an external tabular
//! engine: it builds the connection descriptor (encryption on, token as a
//! credential option, table XOR query), hands it to the engine, and forwards
//! the resulting dataset to a managed table sink. The engine and sink are
//! trait seams; their internals, including the dataset type, stay opaque.
//!
//! ## Example
//!
//! ```rust,ignore
//! use synapse_auth::{DeviceCodeAuth, IdentityConfig};
//! use synapse_source::{ExtractionJob, Selection, WarehouseConfig};
//!
//! let auth = DeviceCodeAuth::public(IdentityConfig::for_azure_sql(client_id, tenant_id))?;
//! let job = ExtractionJob::new(
//!     WarehouseConfig::new("example-synapse.sql.azuresynapse.net", "demo"),
//!     Selection::table("dbo.TableName"),
//!     "analytics.table_name",
//! );
//! job.run(&auth, &engine, &sink, |instructions| println!("{instructions}")).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod job;

pub use config::{DEFAULT_HOSTNAME_PATTERN, DEFAULT_PORT, WarehouseConfig};
pub use descriptor::{ConnectionDescriptor, Selection};
pub use engine::{SaveMode, TableSink, TabularEngine};
pub use error::SourceError;
pub use job::{ExtractionJob, load_query, load_table, persist};
