//! Transaction store abstraction
//!
//! The store is the external budget service that owns transactions and
//! computes summaries. Fino only reads from it and submits new transactions.
//!
//! - `TransactionStore` trait: the operations the engine needs
//! - `HttpTransactionStore`: the budget REST API
//! - `MockTransactionStore`: in-memory store that counts calls, for tests
//!   and offline use

pub(crate) mod http;
mod mock;

pub use http::HttpTransactionStore;
pub use mock::MockTransactionStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BudgetReportResponse, NewTransaction, Transaction, TransactionSummary};

/// Operations the engine performs against the transaction store
///
/// Every call is a single attempt; nothing here retries.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Current/previous period totals and the period's transactions
    async fn fetch_summary(&self, user_id: &str) -> Result<TransactionSummary>;

    /// Transactions plus the server's budget report
    async fn fetch_report(&self, user_id: &str) -> Result<BudgetReportResponse>;

    /// Persist a categorized transaction, returning it with its assigned id
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction>;

    /// Where the store lives (for logging)
    fn location(&self) -> &str;
}
