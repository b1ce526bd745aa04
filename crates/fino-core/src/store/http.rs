//! Budget REST API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{BudgetReportResponse, NewTransaction, Transaction, TransactionSummary};

use super::TransactionStore;

/// HTTP client for the budget API
///
/// Endpoints:
/// - `GET  /budget/transactions/summary/{user_id}`
/// - `GET  /budget/report/{user_id}`
/// - `POST /budget/transactions`
#[derive(Clone)]
pub struct HttpTransactionStore {
    http_client: Client,
    base_url: String,
}

impl HttpTransactionStore {
    /// Create a client with the default 30s timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fino/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Turn a non-2xx response into `Error::Api` carrying the body text
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            message
        },
    })
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn fetch_summary(&self, user_id: &str) -> Result<TransactionSummary> {
        let url = format!("{}/budget/transactions/summary/{}", self.base_url, user_id);
        debug!(%url, "Fetching transaction summary");

        let response = check_status(self.http_client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_report(&self, user_id: &str) -> Result<BudgetReportResponse> {
        let url = format!("{}/budget/report/{}", self.base_url, user_id);
        debug!(%url, "Fetching budget report");

        let response = check_status(self.http_client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let url = format!("{}/budget/transactions", self.base_url);
        debug!(%url, category = %transaction.category, "Creating transaction");

        let response = check_status(
            self.http_client
                .post(&url)
                .json(transaction)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    fn location(&self) -> &str {
        &self.base_url
    }
}
