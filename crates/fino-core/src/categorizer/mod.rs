//! Transaction categorization
//!
//! A category is assigned once, when a transaction is created, and never
//! changes afterwards. Categorization is a precondition for creation: if it
//! fails the transaction is not created.
//!
//! # Architecture
//!
//! - `Categorizer` trait: the single operation the pipeline needs
//! - `CategorizerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `HttpCategorizer`, `KeywordCategorizer`

mod http;
mod mock;

pub use http::HttpCategorizer;
pub use mock::{categorize_by_keyword, KeywordCategorizer};

use async_trait::async_trait;

use crate::config::CategorizerConfig;
use crate::error::{Error, Result};
use crate::models::TransactionType;

/// Assigns a category label to a transaction about to be created
#[async_trait]
pub trait Categorizer: Send + Sync {
    /// Category for a transaction's description, amount and direction
    async fn categorize(
        &self,
        reason: &str,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Result<String>;

    /// Backend name (for logging)
    fn name(&self) -> &str;
}

/// Concrete categorizer
#[derive(Clone)]
pub enum CategorizerClient {
    /// Remote categorization service
    Http(HttpCategorizer),
    /// Keyword table, for offline use and tests
    Keyword(KeywordCategorizer),
}

impl CategorizerClient {
    /// Create from the `[categorizer]` config section
    pub fn from_config(config: &CategorizerConfig) -> Result<Self> {
        match config.backend.to_lowercase().as_str() {
            "mock" | "keyword" => Ok(CategorizerClient::Keyword(KeywordCategorizer::new())),
            "http" => {
                let url = config.base_url.as_deref().ok_or_else(|| {
                    Error::Config("categorizer.base_url is required for the http backend".into())
                })?;
                Ok(CategorizerClient::Http(HttpCategorizer::with_timeout(
                    url,
                    config.timeout,
                )?))
            }
            other => Err(Error::Config(format!("Unknown categorizer backend: {}", other))),
        }
    }

    pub fn keyword() -> Self {
        CategorizerClient::Keyword(KeywordCategorizer::new())
    }
}

#[async_trait]
impl Categorizer for CategorizerClient {
    async fn categorize(
        &self,
        reason: &str,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Result<String> {
        match self {
            CategorizerClient::Http(c) => c.categorize(reason, amount, transaction_type).await,
            CategorizerClient::Keyword(c) => c.categorize(reason, amount, transaction_type).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            CategorizerClient::Http(c) => c.name(),
            CategorizerClient::Keyword(c) => c.name(),
        }
    }
}
