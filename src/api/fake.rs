//! In-memory gateway used by pipeline and UI tests.

use std::sync::Mutex;

use super::{Gateway, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{Category, SplitChoice, Transaction, UpdateRequest};
use crate::store::Session;

#[derive(Debug, Default)]
pub(crate) struct FakeGateway {
    pub(crate) transactions: Mutex<Vec<Transaction>>,
    pub(crate) categories: Vec<Category>,
    pub(crate) submitted: Mutex<Vec<Vec<UpdateRequest>>>,
    pub(crate) list_calls: Mutex<Vec<TransactionFilter>>,
    pub(crate) fail_submit_with: Option<u16>,
    pub(crate) fail_list: bool,
}

impl FakeGateway {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Self::default()
        }
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submitted.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub(crate) fn list_call_count(&self) -> usize {
        self.list_calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Gateway for FakeGateway {
    fn list_transactions(&self, _session: &Session, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        if let Ok(mut calls) = self.list_calls.lock() {
            calls.push(filter.clone());
        }
        if self.fail_list {
            return Err(Error::Network {
                status: None,
                message: "connection refused".into(),
            });
        }
        Ok(self
            .transactions
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default())
    }

    fn list_categories(&self, _session: &Session) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    /// Applies updates to the stored list the way the update endpoint does.
    fn submit_updates(&self, _session: &Session, updates: &[UpdateRequest]) -> Result<()> {
        if let Some(status) = self.fail_submit_with {
            return Err(Error::Network {
                status: Some(status),
                message: "update rejected".into(),
            });
        }
        if let Ok(mut stored) = self.transactions.lock() {
            for update in updates {
                if let Some(txn) = stored.iter_mut().find(|t| t.hash == update.hash) {
                    if let Some(split) = update.split {
                        txn.split = Some(split == SplitChoice::Yes);
                    }
                    if let Some(category) = &update.category {
                        txn.category = Some(category.clone());
                    }
                    txn.status = Some(update.status.clone());
                }
            }
        }
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(updates.to_vec());
        }
        Ok(())
    }
}
