//! Budget engine
//!
//! Ties the transaction store, categorizer and snapshot caches together.
//! Reads go through the caches; a successful fetch refreshes the slot and a
//! failed one leaves it as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{
    Clock, FileStore, MemoryStore, OwnerComparator, Snapshot, SnapshotCache, SnapshotStore,
    SystemClock, REPORT_KEY, SUMMARY_KEY,
};
use crate::categorizer::{Categorizer, CategorizerClient};
use crate::config::{CacheBackend, FinoConfig};
use crate::error::{Error, Result};
use crate::models::{BudgetReportResponse, Transaction, TransactionSummary};
use crate::paginate::{PageCursors, DEFAULT_PAGE_SIZE};
use crate::pipeline::{AddTransactionPipeline, TransactionDraft};
use crate::store::{HttpTransactionStore, TransactionStore};
use crate::view::{DashboardView, ReportView};

/// What a cache slot currently holds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub key: String,
    pub owner_id: String,
    pub fetched_at: DateTime<Utc>,
    pub transaction_count: usize,
}

pub struct BudgetEngine<S, C> {
    store: S,
    categorizer: C,
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    summary_cache: SnapshotCache<TransactionSummary>,
    report_cache: SnapshotCache<BudgetReportResponse>,
    page_size: usize,
}

/// Engine wired to the real services
pub type HttpBudgetEngine = BudgetEngine<HttpTransactionStore, CategorizerClient>;

impl HttpBudgetEngine {
    /// Build the store, categorizer and snapshot storage from config
    pub fn from_config(config: &FinoConfig) -> Result<Self> {
        let store = HttpTransactionStore::with_timeout(&config.api.base_url, config.api.timeout)?;
        let categorizer = CategorizerClient::from_config(&config.categorizer)?;

        let snapshots: Arc<dyn SnapshotStore> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
            CacheBackend::File => {
                let dir = config.cache_dir().ok_or_else(|| {
                    Error::Config("could not determine a cache directory; set cache.dir".into())
                })?;
                Arc::new(FileStore::new(dir))
            }
        };

        debug!(
            api = %store.location(),
            categorizer = %categorizer.name(),
            cache = ?config.cache.backend,
            "Configured budget engine"
        );
        Ok(BudgetEngine::new(store, categorizer, snapshots).with_page_size(config.page_size))
    }
}

impl<S, C> BudgetEngine<S, C>
where
    S: TransactionStore,
    C: Categorizer,
{
    pub fn new(store: S, categorizer: C, snapshots: Arc<dyn SnapshotStore>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            summary_cache: SnapshotCache::with_clock(SUMMARY_KEY, snapshots.clone(), clock.clone()),
            report_cache: SnapshotCache::with_clock(REPORT_KEY, snapshots.clone(), clock.clone()),
            store,
            categorizer,
            snapshots,
            clock,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Use `clock` for snapshot timestamps and created_at
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.summary_cache =
            SnapshotCache::with_clock(SUMMARY_KEY, self.snapshots.clone(), clock.clone());
        self.report_cache =
            SnapshotCache::with_clock(REPORT_KEY, self.snapshots.clone(), clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_owner_comparator(mut self, owner_matches: OwnerComparator) -> Self {
        self.summary_cache = self.summary_cache.with_owner_comparator(owner_matches);
        self.report_cache = self.report_cache.with_owner_comparator(owner_matches);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn categorizer(&self) -> &C {
        &self.categorizer
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Summary for `user_id`, from cache when it can be trusted
    pub async fn load_summary(&self, user_id: &str) -> Result<TransactionSummary> {
        if let Some(summary) = self.summary_cache.get(user_id) {
            return Ok(summary);
        }
        debug!(store = %self.store.location(), "Fetching transaction summary");
        let summary = self.store.fetch_summary(user_id).await?;
        self.summary_cache.put(user_id, &summary);
        Ok(summary)
    }

    /// Report for `user_id`, from cache when it can be trusted
    pub async fn load_report(&self, user_id: &str) -> Result<BudgetReportResponse> {
        if let Some(report) = self.report_cache.get(user_id) {
            return Ok(report);
        }
        debug!(store = %self.store.location(), "Fetching budget report");
        let report = self.store.fetch_report(user_id).await?;
        self.report_cache.put(user_id, &report);
        Ok(report)
    }

    /// Fetch fresh summary and report, bypassing the caches
    ///
    /// Slots are only overwritten once both fetches succeed; a failed
    /// refresh keeps whatever was cached.
    pub async fn refresh(&self, user_id: &str) -> Result<()> {
        let summary = self.store.fetch_summary(user_id).await?;
        let report = self.store.fetch_report(user_id).await?;
        self.summary_cache.put(user_id, &summary);
        self.report_cache.put(user_id, &report);
        info!("Refreshed snapshots");
        Ok(())
    }

    pub async fn dashboard(&self, user_id: &str) -> Result<DashboardView> {
        let summary = self.load_summary(user_id).await?;
        Ok(DashboardView::build(&summary))
    }

    pub async fn report(&self, user_id: &str, cursors: &PageCursors) -> Result<ReportView> {
        let report = self.load_report(user_id).await?;
        Ok(ReportView::build(&report, cursors, self.page_size))
    }

    /// Validate, categorize and create a transaction, then drop both snapshots
    pub async fn add_transaction(&self, draft: &TransactionDraft) -> Result<Transaction> {
        AddTransactionPipeline::new(&self.store, &self.categorizer, self.clock.as_ref())
            .invalidates(&self.summary_cache)
            .invalidates(&self.report_cache)
            .run(draft)
            .await
    }

    /// Empty both cache slots
    pub fn invalidate(&self) {
        self.summary_cache.invalidate();
        self.report_cache.invalidate();
    }

    /// Occupied cache slots
    pub fn cache_entries(&self) -> Vec<CacheEntry> {
        let mut entries = Vec::new();
        entries.extend(entry(&self.summary_cache));
        entries.extend(entry(&self.report_cache));
        entries
    }
}

fn entry<T: Snapshot>(cache: &SnapshotCache<T>) -> Option<CacheEntry> {
    cache.peek().map(|snapshot| CacheEntry {
        key: cache.key().to_string(),
        owner_id: snapshot.owner_id,
        fetched_at: snapshot.fetched_at,
        transaction_count: snapshot.transaction_count,
    })
}
