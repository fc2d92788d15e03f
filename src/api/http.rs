use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Gateway, TransactionFilter};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{Category, Transaction, UpdateRequest};
use crate::store::Session;

/// Blocking HTTP client for the transaction API.
#[derive(Debug, Clone)]
pub(crate) struct HttpGateway {
    http_client: Client,
    pub(super) transactions_url: String,
    pub(super) categories_url: String,
    pub(super) update_url: String,
}

impl HttpGateway {
    pub(crate) fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            transactions_url: config.endpoint(&config.transactions_path),
            categories_url: config.endpoint(&config.categories_path),
            update_url: config.endpoint(&config.update_path),
        })
    }

    fn authorize(request: RequestBuilder, session: &Session) -> RequestBuilder {
        match &session.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl Gateway for HttpGateway {
    fn list_transactions(&self, session: &Session, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let params = filter.query_params(session);
        debug!(url = %self.transactions_url, ?params, "fetching transactions");

        let request = self.http_client.get(&self.transactions_url).query(&params);
        let response = Self::authorize(request, session).send()?;
        let transactions: Vec<Transaction> = read_json(response)?;

        info!(count = transactions.len(), "fetched transactions");
        Ok(transactions)
    }

    fn list_categories(&self, session: &Session) -> Result<Vec<Category>> {
        debug!(url = %self.categories_url, "fetching categories");

        let request = self
            .http_client
            .get(&self.categories_url)
            .query(&[("userid", session.user_id.as_str())]);
        let response = Self::authorize(request, session).send()?;
        let categories: Vec<Category> = read_json(response)?;

        debug!(count = categories.len(), "fetched categories");
        Ok(categories)
    }

    fn submit_updates(&self, session: &Session, updates: &[UpdateRequest]) -> Result<()> {
        debug!(url = %self.update_url, count = updates.len(), "submitting updates");

        let request = self.http_client.post(&self.update_url).json(updates);
        let response = Self::authorize(request, session).send()?;
        let response = check_status(response)?;

        let body = response.text().unwrap_or_default();
        info!(count = updates.len(), response = %body.trim(), "updates accepted");
        Ok(())
    }
}

/// Turn a non-2xx response into [`Error::Network`] carrying the body text.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        body.trim().to_string()
    };
    warn!(status = status.as_u16(), %message, "request rejected");
    Err(Error::Network {
        status: Some(status.as_u16()),
        message,
    })
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = check_status(response)?.text()?;
    Ok(serde_json::from_str(&body)?)
}
