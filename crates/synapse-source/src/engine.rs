//! Seams for the external tabular engine and managed table sink.

use crate::descriptor::ConnectionDescriptor;
use crate::error::SourceError;

/// How the sink should treat an existing destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Replace the destination table.
    #[default]
    Overwrite,
    /// Append to the destination table.
    Append,
}

impl SaveMode {
    /// The connector-facing name of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Append => "append",
        }
    }
}

impl std::fmt::Display for SaveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external engine that materializes a dataset from a descriptor.
///
/// The dataset type is the engine's own; it flows through this crate
/// opaquely from loader to sink. Engines wrap their failures with
/// [`SourceError::connector`] so diagnostics pass through verbatim.
#[allow(async_fn_in_trait)]
pub trait TabularEngine: Send + Sync {
    /// The engine's dataset type.
    type Dataset;

    /// Execute the load described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Connector`] on engine failure.
    async fn read(&self, descriptor: &ConnectionDescriptor) -> Result<Self::Dataset, SourceError>;
}

/// An external managed-table sink.
#[allow(async_fn_in_trait)]
pub trait TableSink: Send + Sync {
    /// The dataset type this sink accepts.
    type Dataset;

    /// Persist `dataset` under `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Connector`] on sink failure.
    async fn write(
        &self,
        dataset: Self::Dataset,
        destination: &str,
        mode: SaveMode,
    ) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_mode_names() {
        assert_eq!(SaveMode::Overwrite.as_str(), "overwrite");
        assert_eq!(SaveMode::Append.to_string(), "append");
        assert_eq!(SaveMode::default(), SaveMode::Overwrite);
    }
}
