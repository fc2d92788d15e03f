use std::collections::BTreeMap;

use crate::models::{Category, SplitChoice, Transaction};

/// Fields a user changed on one transaction since the last successful
/// submission. Untouched fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PendingEdit {
    pub(crate) split: Option<SplitChoice>,
    pub(crate) category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldChange {
    Split(SplitChoice),
    Category(String),
}

/// Sparse overlay of pending edits keyed by transaction hash. A record
/// only appears here once a user has changed one of its fields.
#[derive(Debug, Default)]
pub(crate) struct ChangeTracker {
    edits: BTreeMap<String, PendingEdit>,
}

impl ChangeTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_change(&mut self, hash: &str, change: FieldChange) {
        let edit = self.edits.entry(hash.to_string()).or_default();
        match change {
            FieldChange::Split(choice) => edit.split = Some(choice),
            FieldChange::Category(name) => edit.category = Some(name),
        }
    }

    /// Record a category choice. A category that is never split also forces
    /// the split decision to "no".
    pub(crate) fn choose_category(&mut self, hash: &str, category: &Category) {
        self.record_change(hash, FieldChange::Category(category.name.clone()));
        if category.is_never_split() {
            self.record_change(hash, FieldChange::Split(SplitChoice::No));
        }
    }

    pub(crate) fn get(&self, hash: &str) -> Option<&PendingEdit> {
        self.edits.get(hash)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &PendingEdit)> {
        self.edits.iter()
    }

    /// Take every pending edit, leaving the tracker empty.
    pub(crate) fn drain(&mut self) -> Vec<(String, PendingEdit)> {
        std::mem::take(&mut self.edits).into_iter().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.edits.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.edits.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The split value shown for `record`: the pending edit if any, else the
    /// fetched value. `None` is the unset state.
    pub(crate) fn effective_split(&self, record: &Transaction) -> Option<SplitChoice> {
        self.get(&record.hash)
            .and_then(|e| e.split)
            .or_else(|| SplitChoice::from_flag(record.split))
    }

    pub(crate) fn effective_category<'a>(&'a self, record: &'a Transaction) -> Option<&'a str> {
        self.get(&record.hash)
            .and_then(|e| e.category.as_deref())
            .or(record.category.as_deref())
    }

    /// Whether manual split edits are disabled for `record` because its
    /// effective category is never split.
    pub(crate) fn split_locked(&self, record: &Transaction, categories: &[Category]) -> bool {
        self.effective_category(record)
            .and_then(|name| categories.iter().find(|c| c.name == name))
            .is_some_and(Category::is_never_split)
    }

    /// The split value shown for `record` once `categories` are known. A
    /// locked record always reads "no".
    pub(crate) fn displayed_split(
        &self,
        record: &Transaction,
        categories: &[Category],
    ) -> Option<SplitChoice> {
        if self.split_locked(record, categories) {
            return Some(SplitChoice::No);
        }
        self.effective_split(record)
    }

    /// Record split = "no" for every record whose existing category is never
    /// split but whose split is not already "no", so the forced value reaches
    /// the next submission. Returns how many records were forced.
    pub(crate) fn force_never_split(
        &mut self,
        records: &[Transaction],
        categories: &[Category],
    ) -> usize {
        let forced: Vec<String> = records
            .iter()
            .filter(|r| {
                self.split_locked(r, categories)
                    && self.effective_split(r) != Some(SplitChoice::No)
            })
            .map(|r| r.hash.clone())
            .collect();
        for hash in &forced {
            self.record_change(hash, FieldChange::Split(SplitChoice::No));
        }
        forced.len()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
