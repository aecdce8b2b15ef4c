//! Connection descriptors for the external tabular engine.

use synapse_auth::AccessToken;

use crate::config::WarehouseConfig;
use crate::error::SourceError;

/// What to read from the warehouse: a whole table or a pushed-down query.
///
/// The two modes are mutually exclusive by construction; a descriptor can
/// never carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Read a full table (e.g. `dbo.TableName`).
    Table(String),
    /// Push a raw SQL query down to the warehouse.
    Query(String),
}

impl Selection {
    /// Select a full table.
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(name.into())
    }

    /// Select the result of a raw SQL query.
    pub fn query(sql: impl Into<String>) -> Self {
        Self::Query(sql.into())
    }
}

/// Everything the external connector needs for one load.
///
/// Constructed fresh per load and never reused across database changes.
/// The access token travels as a credential option, never inside the URL,
/// and encryption-in-transit is always on.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    url: String,
    database: String,
    selection: Selection,
    access_token: AccessToken,
    encrypt: bool,
    host_name_in_certificate: String,
}

impl ConnectionDescriptor {
    /// Build a descriptor for the given warehouse and selection.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Descriptor`] when the warehouse config is
    /// incomplete or the selection is empty.
    pub fn new(
        config: &WarehouseConfig,
        selection: Selection,
        access_token: AccessToken,
    ) -> Result<Self, SourceError> {
        config.validate()?;
        let target = match &selection {
            Selection::Table(name) => name,
            Selection::Query(sql) => sql,
        };
        if target.trim().is_empty() {
            return Err(SourceError::Descriptor(
                "table name or query must not be empty".into(),
            ));
        }
        Ok(Self {
            url: config.database_url(),
            database: config.database.clone(),
            selection,
            access_token,
            encrypt: true,
            host_name_in_certificate: config.host_name_in_certificate.clone(),
        })
    }

    /// The JDBC-style URL, database included, token excluded.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The target database name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The table name, when this descriptor reads a full table.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match &self.selection {
            Selection::Table(name) => Some(name),
            Selection::Query(_) => None,
        }
    }

    /// The raw SQL query, when this descriptor pushes one down.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match &self.selection {
            Selection::Query(sql) => Some(sql),
            Selection::Table(_) => None,
        }
    }

    /// The bearer token presented to the warehouse.
    #[must_use]
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Whether encryption-in-transit is requested (always `true`).
    #[must_use]
    pub fn encrypt(&self) -> bool {
        self.encrypt
    }

    /// The certificate hostname pattern for TLS validation.
    #[must_use]
    pub fn host_name_in_certificate(&self) -> &str {
        &self.host_name_in_certificate
    }

    /// Render the connector option set, in a stable order.
    ///
    /// Exactly one of `dbtable` and `query` is present. The option values
    /// are string-typed because the connector surface is.
    #[must_use]
    pub fn options(&self) -> Vec<(&'static str, String)> {
        let mut options = vec![
            ("url", self.url.clone()),
            ("database", self.database.clone()),
        ];
        match &self.selection {
            Selection::Table(name) => options.push(("dbtable", name.clone())),
            Selection::Query(sql) => options.push(("query", sql.clone())),
        }
        options.push(("accessToken", self.access_token.secret().to_string()));
        options.push(("encrypt", self.encrypt.to_string()));
        options.push((
            "hostNameInCertificate",
            self.host_name_in_certificate.clone(),
        ));
        options
    }
}

impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("selection", &self.selection)
            .field("access_token", &"[REDACTED]")
            .field("encrypt", &self.encrypt)
            .field("host_name_in_certificate", &self.host_name_in_certificate)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> WarehouseConfig {
        WarehouseConfig::new("example-synapse.sql.azuresynapse.net", "demo")
    }

    fn token() -> AccessToken {
        AccessToken::new("token-secret")
    }

    #[test]
    fn test_table_descriptor_has_no_query_key() {
        let descriptor =
            ConnectionDescriptor::new(&config(), Selection::table("dbo.TableName"), token())
                .unwrap();
        assert_eq!(descriptor.database(), "demo");
        assert_eq!(descriptor.table(), Some("dbo.TableName"));
        assert_eq!(descriptor.query(), None);

        let options = descriptor.options();
        assert!(options.iter().any(|(k, v)| *k == "dbtable" && v == "dbo.TableName"));
        assert!(options.iter().all(|(k, _)| *k != "query"));
    }

    #[test]
    fn test_query_descriptor_has_no_dbtable_key() {
        let sql = "SELECT * FROM dbo.TableName WHERE Id = 1";
        let descriptor =
            ConnectionDescriptor::new(&config(), Selection::query(sql), token()).unwrap();
        assert_eq!(descriptor.query(), Some(sql));
        assert_eq!(descriptor.table(), None);

        let options = descriptor.options();
        assert!(options.iter().any(|(k, v)| *k == "query" && v == sql));
        assert!(options.iter().all(|(k, _)| *k != "dbtable"));
    }

    #[test]
    fn test_token_stays_out_of_url() {
        let descriptor =
            ConnectionDescriptor::new(&config(), Selection::table("dbo.TableName"), token())
                .unwrap();
        assert_eq!(
            descriptor.url(),
            "jdbc:sqlserver://example-synapse.sql.azuresynapse.net:1433;database=demo"
        );
        assert!(!descriptor.url().contains("token-secret"));

        let options = descriptor.options();
        assert!(options.iter().any(|(k, v)| *k == "accessToken" && v == "token-secret"));
        let (_, url) = options.iter().find(|(k, _)| *k == "url").unwrap();
        assert!(!url.contains("token-secret"));
    }

    #[test]
    fn test_encryption_and_hostname_pattern_are_set() {
        let descriptor =
            ConnectionDescriptor::new(&config(), Selection::table("dbo.TableName"), token())
                .unwrap();
        let options = descriptor.options();
        assert!(options.iter().any(|(k, v)| *k == "encrypt" && v == "true"));
        assert!(
            options
                .iter()
                .any(|(k, v)| *k == "hostNameInCertificate" && v == "*.sql.azuresynapse.net")
        );
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let err = ConnectionDescriptor::new(&config(), Selection::table("  "), token())
            .unwrap_err();
        assert!(matches!(err, SourceError::Descriptor(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let descriptor =
            ConnectionDescriptor::new(&config(), Selection::table("dbo.TableName"), token())
                .unwrap();
        let debug = format!("{descriptor:?}");
        assert!(!debug.contains("token-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
