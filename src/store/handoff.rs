use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::Transaction;

use super::LocalStore;

const HANDOFF_KEY: &str = "categoryData";

/// Records filtered to one category, passed from the dashboard to the
/// category detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CategoryHandoff {
    pub(crate) category: String,
    pub(crate) records: Vec<Transaction>,
}

pub(crate) fn store_category_handoff(store: &LocalStore, handoff: &CategoryHandoff) -> Result<()> {
    debug!(
        category = %handoff.category,
        count = handoff.records.len(),
        "storing category handoff"
    );
    store.set(HANDOFF_KEY, handoff)
}

/// Read the pending handoff and clear it, so each handoff is consumed once.
pub(crate) fn take_category_handoff(store: &LocalStore) -> Result<Option<CategoryHandoff>> {
    let handoff: Option<CategoryHandoff> = store.get(HANDOFF_KEY)?;
    if handoff.is_some() {
        store.remove(HANDOFF_KEY)?;
    }
    Ok(handoff)
}
