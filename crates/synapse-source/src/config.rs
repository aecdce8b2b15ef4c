//! Warehouse connection configuration.

use crate::error::SourceError;

/// Default TDS endpoint port for Synapse dedicated pools.
pub const DEFAULT_PORT: u16 = 1433;

/// Default certificate hostname pattern for Synapse server certificates.
pub const DEFAULT_HOSTNAME_PATTERN: &str = "*.sql.azuresynapse.net";

/// Connection parameters for one warehouse database.
///
/// A config is bound to a single database; build a fresh one when the
/// database changes so descriptors never mix targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Warehouse server hostname (e.g. `example-synapse.sql.azuresynapse.net`).
    pub server_url: String,
    /// Target database name.
    pub database: String,
    /// TDS endpoint port (default: 1433).
    pub port: u16,
    /// Certificate hostname pattern for TLS validation
    /// (default: `*.sql.azuresynapse.net`).
    pub host_name_in_certificate: String,
}

impl WarehouseConfig {
    /// Create a configuration with default port and hostname pattern.
    pub fn new(server_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            database: database.into(),
            port: DEFAULT_PORT,
            host_name_in_certificate: DEFAULT_HOSTNAME_PATTERN.to_string(),
        }
    }

    /// Set the TDS endpoint port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the certificate hostname pattern.
    #[must_use]
    pub fn host_name_in_certificate(mut self, pattern: impl Into<String>) -> Self {
        self.host_name_in_certificate = pattern.into();
        self
    }

    /// Validate that the server and database are present.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Descriptor`] naming the first empty field.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.server_url.trim().is_empty() {
            return Err(SourceError::Descriptor("server_url must not be empty".into()));
        }
        if self.database.trim().is_empty() {
            return Err(SourceError::Descriptor("database must not be empty".into()));
        }
        Ok(())
    }

    /// The JDBC-style server URL, without a database.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!("jdbc:sqlserver://{}:{};", self.server_url, self.port)
    }

    /// The JDBC-style URL with the database appended.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!("{}database={}", self.connection_url(), self.database)
    }
}
