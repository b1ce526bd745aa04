//! In-memory transaction store
//!
//! Keeps one summary per user and recomputes the current-period totals when
//! transactions are created. Call counters let tests assert how many round
//! trips the engine made.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    BudgetReport, BudgetReportResponse, NewTransaction, ReportSummary, Transaction,
    TransactionSummary,
};

use super::TransactionStore;

#[derive(Default)]
struct Counters {
    summary_fetches: AtomicUsize,
    report_fetches: AtomicUsize,
    creates: AtomicUsize,
}

/// Mock transaction store for testing
///
/// Clones share state, so a test can keep a handle while the engine owns
/// another.
#[derive(Clone, Default)]
pub struct MockTransactionStore {
    summaries: Arc<Mutex<HashMap<String, TransactionSummary>>>,
    reports: Arc<Mutex<HashMap<String, BudgetReport>>>,
    counters: Arc<Counters>,
    failing: Arc<AtomicBool>,
    next_id: Arc<AtomicUsize>,
}

impl MockTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's summary
    pub fn with_summary(self, summary: TransactionSummary) -> Self {
        if let Ok(mut summaries) = self.summaries.lock() {
            summaries.insert(summary.user_id.clone(), summary);
        }
        self
    }

    /// Seed the recommendations/alerts returned for a user's report
    pub fn with_report(self, user_id: &str, report: BudgetReport) -> Self {
        if let Ok(mut reports) = self.reports.lock() {
            reports.insert(user_id.to_string(), report);
        }
        self
    }

    /// Make every call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn summary_fetches(&self) -> usize {
        self.counters.summary_fetches.load(Ordering::SeqCst)
    }

    pub fn report_fetches(&self) -> usize {
        self.counters.report_fetches.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.counters.creates.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Api {
                status: 503,
                message: "mock store unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn summary(&self, user_id: &str) -> Result<TransactionSummary> {
        let summaries = self
            .summaries
            .lock()
            .map_err(poisoned)?;
        summaries
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No transactions for user {}", user_id)))
    }
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Io(std::io::Error::other("mock store lock poisoned"))
}

#[async_trait]
impl TransactionStore for MockTransactionStore {
    async fn fetch_summary(&self, user_id: &str) -> Result<TransactionSummary> {
        self.counters.summary_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.summary(user_id)
    }

    async fn fetch_report(&self, user_id: &str) -> Result<BudgetReportResponse> {
        self.counters.report_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let summary = self.summary(user_id)?;

        let mut budget_report = self
            .reports
            .lock()
            .map_err(poisoned)?
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        budget_report.summary = ReportSummary {
            total_income: summary.income,
            total_expense: summary.expense,
            net_savings: summary.net_savings(),
        };

        Ok(BudgetReportResponse {
            transactions: summary.transactions,
            budget_report,
        })
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        self.counters.creates.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Transaction {
            id: format!("mock-{}", id),
            user_id: transaction.user_id.clone(),
            date: transaction.date,
            amount: transaction.amount,
            reason: transaction.reason.clone(),
            category: transaction.category.clone(),
            transaction_type: transaction.transaction_type,
            created_at: transaction.created_at,
        };

        let mut summaries = self
            .summaries
            .lock()
            .map_err(poisoned)?;
        let summary = summaries
            .entry(transaction.user_id.clone())
            .or_insert_with(|| TransactionSummary {
                user_id: transaction.user_id.clone(),
                balance: 0.0,
                income: 0.0,
                expense: 0.0,
                previous_balance: 0.0,
                previous_income: 0.0,
                previous_expense: 0.0,
                transactions: Vec::new(),
            });
        if created.is_income() {
            summary.income += created.amount;
        } else {
            summary.expense += created.amount;
        }
        summary.balance = summary.income - summary.expense;
        summary.transactions.push(created.clone());

        Ok(created)
    }

    fn location(&self) -> &str {
        "memory"
    }
}
