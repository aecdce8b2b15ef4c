//! In-memory tabular engine and table sink.

use parking_lot::Mutex;

use synapse_source::{ConnectionDescriptor, SaveMode, SourceError, TableSink, TabularEngine};

/// The dataset type the in-memory doubles trade in: rows of strings.
pub type Rows = Vec<Vec<String>>;

/// A [`TabularEngine`] that returns a fixed dataset and records descriptors.
pub struct MemoryEngine {
    dataset: Rows,
    reads: Mutex<Vec<ConnectionDescriptor>>,
}

impl MemoryEngine {
    /// An engine that answers every read with `rows`.
    #[must_use]
    pub fn with_rows(rows: Rows) -> Self {
        Self {
            dataset: rows,
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Descriptors seen so far, in call order.
    #[must_use]
    pub fn reads(&self) -> Vec<ConnectionDescriptor> {
        self.reads.lock().clone()
    }

    /// Number of reads executed.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.lock().len()
    }
}

impl TabularEngine for MemoryEngine {
    type Dataset = Rows;

    async fn read(&self, descriptor: &ConnectionDescriptor) -> Result<Rows, SourceError> {
        self.reads.lock().push(descriptor.clone());
        Ok(self.dataset.clone())
    }
}

/// A [`TabularEngine`] that always fails, for error-propagation tests.
pub struct FailingEngine {
    message: String,
}

impl FailingEngine {
    /// An engine whose every read fails with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TabularEngine for FailingEngine {
    type Dataset = Rows;

    async fn read(&self, _descriptor: &ConnectionDescriptor) -> Result<Rows, SourceError> {
        Err(SourceError::connector(self.message.clone()))
    }
}

/// A [`TableSink`] that records every write.
#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, SaveMode, Rows)>>,
}

impl MemorySink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes seen so far: destination, mode, and dataset, in call order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, SaveMode, Rows)> {
        self.writes.lock().clone()
    }

    /// Number of writes executed.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl TableSink for MemorySink {
    type Dataset = Rows;

    async fn write(
        &self,
        dataset: Rows,
        destination: &str,
        mode: SaveMode,
    ) -> Result<(), SourceError> {
        self.writes
            .lock()
            .push((destination.to_string(), mode, dataset));
        Ok(())
    }
}
