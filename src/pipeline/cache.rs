use tracing::debug;

use super::SortState;
use crate::models::Transaction;

/// Snapshot of the last fetched transaction list. Every load is a full
/// replace; there is no incremental merge.
#[derive(Debug, Default)]
pub(crate) struct TransactionCache {
    records: Vec<Transaction>,
    generation: u64,
}

impl TransactionCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot. Returns the new generation number.
    pub(crate) fn load(&mut self, records: Vec<Transaction>) -> u64 {
        self.generation += 1;
        debug!(
            generation = self.generation,
            count = records.len(),
            "transaction cache replaced"
        );
        self.records = records;
        self.generation
    }

    pub(crate) fn all(&self) -> &[Transaction] {
        &self.records
    }

    pub(crate) fn find_by_identity(&self, hash: &str) -> Option<&Transaction> {
        self.records.iter().find(|t| t.hash == hash)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Reorder the snapshot in place. Identities and field values are
    /// untouched, so this does not count as a new generation.
    pub(crate) fn sort(&mut self, state: &SortState) {
        state.apply(&mut self.records);
    }
}
