//! Remote data gateway: list transactions, list categories, submit batched
//! updates. [`Gateway`] is the seam the pipeline and UI talk to;
//! [`HttpGateway`] is the real implementation.

mod http;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Category, Transaction, UpdateRequest};
use crate::store::Session;

pub(crate) use http::HttpGateway;

pub(crate) trait Gateway: Send + Sync {
    fn list_transactions(&self, session: &Session, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    fn list_categories(&self, session: &Session) -> Result<Vec<Category>>;

    fn submit_updates(&self, session: &Session, updates: &[UpdateRequest]) -> Result<()>;
}

/// Query parameter names carrying the transaction date range. Deployments
/// differ on these for the reviewed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateParams {
    pub(crate) start: String,
    pub(crate) end: String,
}

impl Default for DateParams {
    fn default() -> Self {
        Self {
            start: "startDate".into(),
            end: "endDate".into(),
        }
    }
}

/// Optional filters on the transactions list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TransactionFilter {
    pub(crate) status: Option<String>,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) csv_start_date: Option<NaiveDate>,
    pub(crate) csv_end_date: Option<NaiveDate>,
    pub(crate) date_params: DateParams,
}

impl TransactionFilter {
    pub(crate) fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub(crate) fn with_date_params(mut self, date_params: DateParams) -> Self {
        self.date_params = date_params;
        self
    }

    /// Query parameters for the list endpoint. Only set values are sent.
    pub(crate) fn query_params(&self, session: &Session) -> Vec<(&str, String)> {
        let mut params = vec![("userid", session.user_id.clone())];
        if let Some(status) = self.status.as_ref().filter(|s| !s.is_empty()) {
            params.push(("status", status.clone()));
        }
        let dates = [
            (self.date_params.start.as_str(), self.start_date),
            (self.date_params.end.as_str(), self.end_date),
            ("csvStartDate", self.csv_start_date),
            ("csvEndDate", self.csv_end_date),
        ];
        for (name, date) in dates {
            if let Some(d) = date {
                params.push((name, d.format("%Y-%m-%d").to_string()));
            }
        }
        params
    }

    /// Human-readable summary for status lines.
    pub(crate) fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = &self.status {
            parts.push(format!("status={status}"));
        }
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => parts.push(format!("{s}..{e}")),
            (Some(s), None) => parts.push(format!("from {s}")),
            (None, Some(e)) => parts.push(format!("until {e}")),
            (None, None) => {}
        }
        match (self.csv_start_date, self.csv_end_date) {
            (Some(s), Some(e)) => parts.push(format!("added {s}..{e}")),
            (Some(s), None) => parts.push(format!("added from {s}")),
            (None, Some(e)) => parts.push(format!("added until {e}")),
            (None, None) => {}
        }
        if parts.is_empty() {
            "all".into()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
pub(crate) mod fake;
