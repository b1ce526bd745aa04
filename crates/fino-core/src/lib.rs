//! Fino Core Library
//!
//! Budget analytics for the Fino client:
//! - Category aggregation of transactions
//! - Independent pagination of the all/expenses/income views
//! - Financial health scoring
//! - Ownership-checked snapshot cache
//! - Add-transaction pipeline with pluggable categorizers
//! - Budget API client and in-memory mocks
//! - Two-layer TOML configuration

pub mod aggregate;
pub mod cache;
pub mod categorizer;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod paginate;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod view;

/// Test utilities including mock budget API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    category_totals, group_by_category, largest_category, total_by_type, CategoryBuckets,
    CategoryTotal, UNCATEGORIZED,
};
pub use cache::{
    CachedSnapshot, Clock, FileStore, FixedClock, Lookup, MemoryStore, MissReason,
    OwnerComparator, Snapshot, SnapshotCache, SnapshotStore, SystemClock, REPORT_KEY, SUMMARY_KEY,
};
pub use categorizer::{Categorizer, CategorizerClient, HttpCategorizer, KeywordCategorizer};
pub use config::{CacheBackend, FinoConfig};
pub use engine::{BudgetEngine, CacheEntry, HttpBudgetEngine};
pub use error::{Error, Result};
pub use models::{
    BudgetReport, BudgetReportResponse, NewTransaction, ReportSummary, Transaction,
    TransactionSummary, TransactionType,
};
pub use paginate::{paginate, total_pages, PageCursors, PageView, TransactionViews, View};
pub use pipeline::{AddTransactionPipeline, TransactionDraft};
pub use scoring::{score, ScoreSet};
pub use store::{HttpTransactionStore, MockTransactionStore, TransactionStore};
pub use view::{percent_change, DashboardView, Direction, PercentChange, ReportView};
