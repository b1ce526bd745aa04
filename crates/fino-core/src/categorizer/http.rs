//! Remote categorization service client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategorizeRequest, Categorization, TransactionType};
use crate::store::http::check_status;

use super::Categorizer;

/// Client for `POST /budget/categorize`
#[derive(Clone)]
pub struct HttpCategorizer {
    http_client: Client,
    base_url: String,
}

impl HttpCategorizer {
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

#[async_trait]
impl Categorizer for HttpCategorizer {
    async fn categorize(
        &self,
        reason: &str,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Result<String> {
        let url = format!("{}/budget/categorize", self.base_url);
        let request = CategorizeRequest {
            reason: reason.to_string(),
            amount,
            transaction_type,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Categorization(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(|e| Error::Categorization(e.to_string()))?;
        let categorization: Categorization = response
            .json()
            .await
            .map_err(|e| Error::Categorization(format!("invalid response: {}", e)))?;
        debug!(category = %categorization.category, "Categorizer response");

        Ok(categorization.category)
    }

    fn name(&self) -> &str {
        "http"
    }
}
