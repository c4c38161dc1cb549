//! Last fetched history, held for display.

use std::sync::Arc;

use crate::history::source::{HistoryRecord, HistorySource};
use crate::observability::metrics;

/// Holds the most recent history sequence.
pub struct HistoryView {
    source: Arc<dyn HistorySource>,
    records: Vec<HistoryRecord>,
}

impl HistoryView {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self {
            source,
            records: Vec::new(),
        }
    }

    /// Fetch from the backend and replace the held records.
    ///
    /// A failed fetch is logged and leaves the view empty.
    pub async fn load(&mut self) -> &[HistoryRecord] {
        self.records = match self.source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "History unavailable, showing no data");
                Vec::new()
            }
        };
        metrics::record_history_size(self.records.len());
        tracing::debug!(records = self.records.len(), "History loaded");
        &self.records
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }
}
