//! Ownership-checked snapshot cache
//!
//! Each [`SnapshotCache`] owns one slot in a [`SnapshotStore`] under a fixed
//! key. Only one user's data is kept per slot; a read for a different user,
//! or of a snapshot with no transactions, is a miss.
//!
//! Cache operations never fail. Storage and decode faults are logged and
//! degrade to a miss, and a blob that cannot be decoded is discarded.

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{BudgetReportResponse, TransactionSummary};

/// Slot holding the report endpoint's response
pub const REPORT_KEY: &str = "report";

/// Slot holding the summary endpoint's response
pub const SUMMARY_KEY: &str = "summary";

/// Source of "now" for snapshot timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant (for tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Anything that can be cached as a snapshot
pub trait Snapshot: Serialize + DeserializeOwned + Clone {
    /// Number of transactions carried; an empty snapshot is never trusted
    fn transaction_count(&self) -> usize;
}

impl Snapshot for TransactionSummary {
    fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl Snapshot for BudgetReportResponse {
    fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Key/value storage for serialized snapshots
pub trait SnapshotStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("snapshot store lock poisoned")))
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.slots()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.local/share/fino/cache` (platform equivalent elsewhere)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("fino").join("cache"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves half a blob behind
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, blob)?;
        fs::rename(tmp, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A point-in-time copy of fetched data and who it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot<T> {
    pub owner_id: String,
    pub fetched_at: DateTime<Utc>,
    pub transaction_count: usize,
    pub data: T,
}

/// Why a read did not return a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Empty,
    OwnerMismatch,
    NoTransactions,
    Unreadable,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::Empty => "empty",
            MissReason::OwnerMismatch => "owner_mismatch",
            MissReason::NoTransactions => "no_transactions",
            MissReason::Unreadable => "unreadable",
        }
    }
}

/// Result of a cache read
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Hit(T),
    Miss(MissReason),
}

impl<T> Lookup<T> {
    pub fn into_hit(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss(_) => None,
        }
    }
}

/// Compares a cached owner with the requesting user
pub type OwnerComparator = fn(cached_owner: &str, requester: &str) -> bool;

fn exact_owner(cached_owner: &str, requester: &str) -> bool {
    cached_owner == requester
}

/// Single-slot, ownership-checked cache for one kind of snapshot
pub struct SnapshotCache<T: Snapshot> {
    key: String,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    owner_matches: OwnerComparator,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Snapshot> SnapshotCache<T> {
    pub fn new(key: &str, store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_clock(key, store, Arc::new(SystemClock))
    }

    pub fn with_clock(key: &str, store: Arc<dyn SnapshotStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            key: key.to_string(),
            store,
            clock,
            owner_matches: exact_owner,
            _marker: PhantomData,
        }
    }

    /// Replace the owner comparison (exact string equality by default)
    pub fn with_owner_comparator(mut self, owner_matches: OwnerComparator) -> Self {
        self.owner_matches = owner_matches;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cached data for `user_id`, if it can be trusted
    pub fn get(&self, user_id: &str) -> Option<T> {
        self.lookup(user_id).into_hit()
    }

    /// Like [`get`](Self::get) but says why a read missed
    ///
    /// An owner mismatch discards the stored snapshot.
    pub fn lookup(&self, user_id: &str) -> Lookup<T> {
        let snapshot = match self.read() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(key = %self.key, "Snapshot cache empty");
                return Lookup::Miss(MissReason::Empty);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable snapshot");
                self.discard();
                return Lookup::Miss(MissReason::Unreadable);
            }
        };

        if !(self.owner_matches)(&snapshot.owner_id, user_id) {
            debug!(key = %self.key, "Snapshot belongs to another user, discarding");
            self.discard();
            return Lookup::Miss(MissReason::OwnerMismatch);
        }

        if snapshot.transaction_count == 0 || snapshot.data.transaction_count() == 0 {
            debug!(key = %self.key, "Snapshot has no transactions, not trusted");
            return Lookup::Miss(MissReason::NoTransactions);
        }

        debug!(key = %self.key, fetched_at = %snapshot.fetched_at, "Snapshot cache hit");
        Lookup::Hit(snapshot.data)
    }

    /// Stored snapshot with metadata, without any ownership check
    pub fn peek(&self) -> Option<CachedSnapshot<T>> {
        self.read().ok().flatten()
    }

    /// Overwrite the slot with freshly fetched data
    pub fn put(&self, user_id: &str, data: &T) {
        let snapshot = CachedSnapshot {
            owner_id: user_id.to_string(),
            fetched_at: self.clock.now(),
            transaction_count: data.transaction_count(),
            data: data.clone(),
        };
        let result = serde_json::to_string(&snapshot)
            .map_err(Error::from)
            .and_then(|blob| self.store.save(&self.key, &blob));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to write snapshot");
        }
    }

    /// Drop the slot so the next read refetches
    pub fn invalidate(&self) {
        debug!(key = %self.key, "Invalidating snapshot");
        self.discard();
    }

    fn read(&self) -> Result<Option<CachedSnapshot<T>>> {
        match self.store.load(&self.key)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to remove snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wire::parse_datetime;
    use crate::models::{Transaction, TransactionType};
    use chrono::TimeZone;

    fn summary_for(user: &str, n: usize) -> TransactionSummary {
        let date = parse_datetime("2024-05-01 12:00:00").unwrap();
        TransactionSummary {
            user_id: user.into(),
            balance: 100.0,
            income: 300.0,
            expense: 200.0,
            previous_balance: 50.0,
            previous_income: 0.0,
            previous_expense: 0.0,
            transactions: (0..n)
                .map(|i| Transaction {
                    id: i.to_string(),
                    user_id: user.into(),
                    date,
                    amount: 10.0,
                    reason: "x".into(),
                    category: "Misc".into(),
                    transaction_type: TransactionType::Expense,
                    created_at: date,
                })
                .collect(),
        }
    }

    fn memory_cache() -> (Arc<MemoryStore>, SnapshotCache<TransactionSummary>) {
        let store = Arc::new(MemoryStore::new());
        let cache = SnapshotCache::new(SUMMARY_KEY, store.clone());
        (store, cache)
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Io(std::io::Error::other("disk gone")))
        }
        fn save(&self, _key: &str, _blob: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk gone")))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_round_trip_same_owner() {
        let (_, cache) = memory_cache();
        let summary = summary_for("alice", 3);
        cache.put("alice", &summary);
        assert_eq!(cache.get("alice"), Some(summary));
    }

    #[test]
    fn test_other_owner_misses_and_discards() {
        let (store, cache) = memory_cache();
        cache.put("alice", &summary_for("alice", 3));

        assert_eq!(cache.lookup("bob"), Lookup::Miss(MissReason::OwnerMismatch));
        assert!(store.load(SUMMARY_KEY).unwrap().is_none());
        assert!(cache.get("alice").is_none());
    }

    #[test]
    fn test_empty_snapshot_not_trusted() {
        let (_, cache) = memory_cache();
        cache.put("alice", &summary_for("alice", 0));
        assert_eq!(
            cache.lookup("alice"),
            Lookup::Miss(MissReason::NoTransactions)
        );
    }

    #[test]
    fn test_invalidate_forces_miss() {
        let (_, cache) = memory_cache();
        cache.put("alice", &summary_for("alice", 2));
        cache.invalidate();
        assert_eq!(cache.lookup("alice"), Lookup::Miss(MissReason::Empty));
    }

    #[test]
    fn test_put_overwrites_slot() {
        let (_, cache) = memory_cache();
        cache.put("alice", &summary_for("alice", 2));
        let bob = summary_for("bob", 4);
        cache.put("bob", &bob);
        assert_eq!(cache.get("bob"), Some(bob));
        // Single slot: alice's data is gone, and her read evicts bob's
        assert!(cache.get("alice").is_none());
        assert!(cache.peek().is_none());
    }

    #[test]
    fn test_corrupt_blob_is_discarded() {
        let (store, cache) = memory_cache();
        store.save(SUMMARY_KEY, "{not json").unwrap();
        assert_eq!(cache.lookup("alice"), Lookup::Miss(MissReason::Unreadable));
        assert!(store.load(SUMMARY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_broken_store_degrades_to_miss() {
        let cache: SnapshotCache<TransactionSummary> =
            SnapshotCache::new(SUMMARY_KEY, Arc::new(BrokenStore));
        cache.put("alice", &summary_for("alice", 1));
        assert!(cache.get("alice").is_none());
        cache.invalidate();
    }

    #[test]
    fn test_fetched_at_comes_from_clock() {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap();
        let cache: SnapshotCache<TransactionSummary> = SnapshotCache::with_clock(
            SUMMARY_KEY,
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock(at)),
        );
        cache.put("alice", &summary_for("alice", 1));
        let snapshot = cache.peek().unwrap();
        assert_eq!(snapshot.fetched_at, at);
        assert_eq!(snapshot.owner_id, "alice");
        assert_eq!(snapshot.transaction_count, 1);
    }

    #[test]
    fn test_custom_owner_comparator() {
        let cache: SnapshotCache<TransactionSummary> =
            SnapshotCache::new(SUMMARY_KEY, Arc::new(MemoryStore::new()))
                .with_owner_comparator(|cached, requester| cached.eq_ignore_ascii_case(requester));
        cache.put("Alice", &summary_for("Alice", 1));
        assert!(cache.get("alice").is_some());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join("cache")));
        let cache: SnapshotCache<TransactionSummary> = SnapshotCache::new(REPORT_KEY, store.clone());

        let summary = summary_for("alice", 2);
        cache.put("alice", &summary);
        assert!(dir.path().join("cache").join("report.json").exists());
        assert_eq!(cache.get("alice"), Some(summary));

        cache.invalidate();
        assert!(!dir.path().join("cache").join("report.json").exists());
        // Removing a missing slot is fine
        store.remove(REPORT_KEY).unwrap();
    }
}
