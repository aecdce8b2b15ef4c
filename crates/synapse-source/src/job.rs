//! Load, persist, and the end-to-end extraction sequence.

use synapse_auth::{AccessToken, DeviceCodeAuth, DeviceCodeInstructions, IdentityClient};

use crate::config::WarehouseConfig;
use crate::descriptor::{ConnectionDescriptor, Selection};
use crate::engine::{SaveMode, TableSink, TabularEngine};
use crate::error::SourceError;

/// Load a full table from the warehouse.
///
/// # Errors
///
/// Returns [`SourceError::Descriptor`] for an unbuildable descriptor or
/// [`SourceError::Connector`] when the engine fails.
pub async fn load_table<E: TabularEngine>(
    engine: &E,
    config: &WarehouseConfig,
    table: &str,
    token: &AccessToken,
) -> Result<E::Dataset, SourceError> {
    let descriptor = ConnectionDescriptor::new(config, Selection::table(table), token.clone())?;
    tracing::debug!(database = config.database.as_str(), table, "loading table");
    engine.read(&descriptor).await
}

/// Load the result of a raw SQL query pushed down to the warehouse.
///
/// # Errors
///
/// Returns [`SourceError::Descriptor`] for an unbuildable descriptor or
/// [`SourceError::Connector`] when the engine fails.
pub async fn load_query<E: TabularEngine>(
    engine: &E,
    config: &WarehouseConfig,
    sql: &str,
    token: &AccessToken,
) -> Result<E::Dataset, SourceError> {
    let descriptor = ConnectionDescriptor::new(config, Selection::query(sql), token.clone())?;
    tracing::debug!(database = config.database.as_str(), "loading query result");
    engine.read(&descriptor).await
}

/// Forward a dataset to the managed table sink.
///
/// # Errors
///
/// Returns [`SourceError::Connector`] when the sink fails.
pub async fn persist<S: TableSink>(
    sink: &S,
    dataset: S::Dataset,
    destination: &str,
    mode: SaveMode,
) -> Result<(), SourceError> {
    tracing::debug!(destination, mode = mode.as_str(), "persisting dataset");
    sink.write(dataset, destination, mode).await
}

/// One warehouse-to-table-store extraction, start to finish.
///
/// Packages the sequential flow: acquire a token, read the selection, hand
/// the dataset to the sink. Each step runs to completion before the next;
/// any failure aborts the run.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    /// Warehouse to read from.
    pub warehouse: WarehouseConfig,
    /// Table or query to extract.
    pub selection: Selection,
    /// Destination table in the managed store.
    pub destination: String,
    /// How the sink treats an existing destination (default: overwrite).
    pub mode: SaveMode,
}

impl ExtractionJob {
    /// Describe an extraction into `destination`.
    pub fn new(
        warehouse: WarehouseConfig,
        selection: Selection,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            warehouse,
            selection,
            destination: destination.into(),
            mode: SaveMode::default(),
        }
    }

    /// Set the save mode.
    #[must_use]
    pub fn mode(mut self, mode: SaveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the extraction end to end.
    ///
    /// `on_instructions` surfaces device-code sign-in instructions when the
    /// token provider cannot go silent.
    ///
    /// # Errors
    ///
    /// Propagates [`SourceError::Auth`] from token acquisition and
    /// [`SourceError::Connector`] from the engine or sink, unmodified.
    pub async fn run<C, E, S, F>(
        &self,
        auth: &DeviceCodeAuth<C>,
        engine: &E,
        sink: &S,
        on_instructions: F,
    ) -> Result<(), SourceError>
    where
        C: IdentityClient,
        E: TabularEngine,
        S: TableSink<Dataset = E::Dataset>,
        F: FnMut(&DeviceCodeInstructions),
    {
        tracing::info!(
            server = self.warehouse.server_url.as_str(),
            database = self.warehouse.database.as_str(),
            destination = self.destination.as_str(),
            "starting extraction"
        );
        let token = auth.acquire_token(on_instructions).await?;
        let dataset = match &self.selection {
            Selection::Table(table) => {
                load_table(engine, &self.warehouse, table, &token).await?
            }
            Selection::Query(sql) => load_query(engine, &self.warehouse, sql, &token).await?,
        };
        persist(sink, dataset, &self.destination, self.mode).await?;
        tracing::info!(destination = self.destination.as_str(), "extraction complete");
        Ok(())
    }
}
