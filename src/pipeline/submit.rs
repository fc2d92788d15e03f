use tracing::{debug, info, warn};

use super::{ChangeTracker, TransactionCache};
use crate::api::{Gateway, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{UpdateRequest, REVIEWED_STATUS};
use crate::store::Session;

/// Result of a successful submit. `refreshed` is `None` when the follow-up
/// fetch failed; the submitted edits are cleared either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmitOutcome {
    pub(crate) submitted: usize,
    pub(crate) refreshed: Option<usize>,
}

/// Turn tracked edits into update requests. Edits whose record is no
/// longer cached are skipped. The amount comes from the cache at the time
/// of this call.
pub(crate) fn build_batch(
    tracker: &ChangeTracker,
    cache: &TransactionCache,
    user_id: &str,
) -> Result<Vec<UpdateRequest>> {
    if tracker.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let batch: Vec<UpdateRequest> = tracker
        .iter()
        .filter_map(|(hash, edit)| {
            let Some(record) = cache.find_by_identity(hash) else {
                debug!(%hash, "skipping edit for transaction no longer cached");
                return None;
            };
            if edit.split.is_none() && edit.category.is_none() {
                return None;
            }
            Some(UpdateRequest {
                hash: hash.clone(),
                userid: user_id.to_string(),
                status: REVIEWED_STATUS.to_string(),
                amount: record.amount,
                split: edit.split,
                category: edit.category.clone(),
            })
        })
        .collect();

    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    Ok(batch)
}

/// Send a batch. An empty batch fails without touching the network.
pub(crate) fn submit(gateway: &dyn Gateway, session: &Session, batch: &[UpdateRequest]) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }
    gateway.submit_updates(session, batch)?;
    info!(count = batch.len(), "batch submitted");
    Ok(())
}

/// build → submit → clear edits → re-fetch. A failure before the submit
/// succeeds leaves the tracker untouched so the user can resubmit.
pub(crate) fn submit_and_refresh(
    gateway: &dyn Gateway,
    session: &Session,
    filter: &TransactionFilter,
    tracker: &mut ChangeTracker,
    cache: &mut TransactionCache,
) -> Result<SubmitOutcome> {
    let batch = build_batch(tracker, cache, &session.user_id)?;
    submit(gateway, session, &batch)?;
    let cleared = tracker.drain();
    debug!(cleared = cleared.len(), "pending edits cleared after submit");

    let refreshed = match gateway.list_transactions(session, filter) {
        Ok(records) => {
            let count = records.len();
            cache.load(records);
            Some(count)
        }
        Err(e) => {
            warn!(error = %e, "refresh after submit failed");
            None
        }
    };

    Ok(SubmitOutcome {
        submitted: batch.len(),
        refreshed,
    })
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
