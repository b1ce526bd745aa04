//! Add-transaction pipeline
//!
//! Stages run in order and stop at the first failure:
//!
//! 1. Validate: reject bad input before any network call
//! 2. Categorize: one categorizer call; no category, no transaction
//! 3. Create: persist through the transaction store
//! 4. Invalidate: drop cached snapshots so the next read refetches

use std::fmt;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::cache::{Clock, Snapshot, SnapshotCache};
use crate::categorizer::Categorizer;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::store::TransactionStore;

/// A transaction as entered by the user, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub user_id: String,
    pub date: Option<NaiveDateTime>,
    pub reason: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
}

impl TransactionDraft {
    /// Check the draft without contacting anything
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation("user is required".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::Validation(format!(
                "amount must be greater than 0 (got {})",
                self.amount
            )));
        }
        if self.reason.trim().is_empty() {
            return Err(Error::Validation("description is required".into()));
        }
        if self.date.is_none() {
            return Err(Error::Validation("date is required".into()));
        }
        Ok(())
    }
}

/// Pipeline stage, for logging and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Categorize,
    Create,
    Invalidate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Categorize => "categorize",
            Stage::Create => "create",
            Stage::Invalidate => "invalidate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something holding data a new transaction makes stale
pub trait Invalidate {
    fn invalidate(&self);
}

impl<T: Snapshot> Invalidate for SnapshotCache<T> {
    fn invalidate(&self) {
        SnapshotCache::invalidate(self);
    }
}

/// Validate → categorize → create → invalidate
pub struct AddTransactionPipeline<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    categorizer: &'a C,
    clock: &'a dyn Clock,
    stale: Vec<&'a dyn Invalidate>,
}

impl<'a, S, C> AddTransactionPipeline<'a, S, C>
where
    S: TransactionStore + ?Sized,
    C: Categorizer + ?Sized,
{
    pub fn new(store: &'a S, categorizer: &'a C, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            categorizer,
            clock,
            stale: Vec::new(),
        }
    }

    /// Register a cache to clear once the transaction exists
    pub fn invalidates(mut self, cache: &'a dyn Invalidate) -> Self {
        self.stale.push(cache);
        self
    }

    pub async fn run(&self, draft: &TransactionDraft) -> Result<Transaction> {
        draft.validate().inspect_err(|e| {
            debug!(stage = %Stage::Validate, error = %e, "Rejected transaction draft");
        })?;
        // validate() guarantees a date
        let date = draft
            .date
            .ok_or_else(|| Error::Validation("date is required".into()))?;

        let category = self.categorize(draft).await?;

        let new_transaction = NewTransaction {
            user_id: draft.user_id.clone(),
            date,
            reason: draft.reason.trim().to_string(),
            amount: draft.amount,
            transaction_type: draft.transaction_type,
            category,
            created_at: self.clock.now().naive_utc(),
        };
        let created = self
            .store
            .create_transaction(&new_transaction)
            .await
            .inspect_err(|e| {
                warn!(stage = %Stage::Create, store = %self.store.location(), error = %e, "Failed to create transaction");
            })?;
        info!(
            id = %created.id,
            category = %created.category,
            transaction_type = %created.transaction_type,
            "Created transaction"
        );

        for cache in &self.stale {
            cache.invalidate();
        }
        debug!(stage = %Stage::Invalidate, caches = self.stale.len(), "Invalidated snapshots");

        Ok(created)
    }

    async fn categorize(&self, draft: &TransactionDraft) -> Result<String> {
        let category = self
            .categorizer
            .categorize(draft.reason.trim(), draft.amount, draft.transaction_type)
            .await
            .map_err(|e| match e {
                Error::Categorization(_) => e,
                other => Error::Categorization(other.to_string()),
            })
            .inspect_err(|e| {
                warn!(stage = %Stage::Categorize, categorizer = %self.categorizer.name(), error = %e, "Categorization failed");
            })?;

        let category = category.trim().to_string();
        if category.is_empty() {
            return Err(Error::Categorization(
                "categorizer returned an empty category".into(),
            ));
        }
        debug!(stage = %Stage::Categorize, %category, "Categorized transaction");
        Ok(category)
    }
}
