//! Integration tests for fino-core
//!
//! These tests exercise the engine's fetch → cache → view and
//! add → invalidate → refetch workflows against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use fino_core::{
    models::wire::parse_datetime, BudgetEngine, BudgetReport, FileStore, KeywordCategorizer,
    MemoryStore, MockTransactionStore, PageCursors, Transaction, TransactionDraft,
    TransactionSummary, TransactionType, View,
};

fn base_date() -> NaiveDateTime {
    parse_datetime("2024-05-01 09:00:00").unwrap()
}

/// 8 expenses and 12 incomes on consecutive days, newest last
fn twenty_transactions(user: &str) -> Vec<Transaction> {
    (0..20)
        .map(|i| {
            let transaction_type = if i < 8 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            };
            let date = base_date() + Duration::days(i);
            Transaction {
                id: format!("t{}", i),
                user_id: user.to_string(),
                date,
                amount: 100.0,
                reason: format!("row {}", i),
                category: if i < 8 { "Groceries" } else { "Salary" }.to_string(),
                transaction_type,
                created_at: date,
            }
        })
        .collect()
}

fn summary_for(user: &str, transactions: Vec<Transaction>) -> TransactionSummary {
    let income: f64 = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let expense: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum();
    TransactionSummary {
        user_id: user.to_string(),
        balance: income - expense,
        income,
        expense,
        previous_balance: 300.0,
        previous_income: 1000.0,
        previous_expense: 700.0,
        transactions,
    }
}

fn memory_engine(store: &MockTransactionStore) -> BudgetEngine<MockTransactionStore, KeywordCategorizer> {
    BudgetEngine::new(
        store.clone(),
        KeywordCategorizer::new(),
        Arc::new(MemoryStore::new()),
    )
}

fn draft(user: &str, reason: &str, amount: f64) -> TransactionDraft {
    TransactionDraft {
        user_id: user.to_string(),
        date: parse_datetime("2024-06-01 12:00:00"),
        reason: reason.to_string(),
        amount,
        transaction_type: TransactionType::Expense,
    }
}

// =============================================================================
// Read-through cache
// =============================================================================

#[tokio::test]
async fn test_repeat_reads_hit_cache() {
    let store =
        MockTransactionStore::new().with_summary(summary_for("alice", twenty_transactions("alice")));
    let engine = memory_engine(&store);

    engine.dashboard("alice").await.unwrap();
    engine.dashboard("alice").await.unwrap();
    engine.report("alice", &PageCursors::default()).await.unwrap();
    engine.report("alice", &PageCursors::default()).await.unwrap();

    assert_eq!(store.summary_fetches(), 1);
    assert_eq!(store.report_fetches(), 1);
}

#[tokio::test]
async fn test_switching_users_refetches() {
    let store = MockTransactionStore::new()
        .with_summary(summary_for("alice", twenty_transactions("alice")))
        .with_summary(summary_for("bob", twenty_transactions("bob")));
    let engine = memory_engine(&store);

    let alice = engine.load_summary("alice").await.unwrap();
    let bob = engine.load_summary("bob").await.unwrap();
    assert_eq!(alice.user_id, "alice");
    assert_eq!(bob.user_id, "bob");
    assert_eq!(store.summary_fetches(), 2);

    // The slot now belongs to bob, so alice fetches again
    let alice_again = engine.load_summary("alice").await.unwrap();
    assert_eq!(alice_again.user_id, "alice");
    assert_eq!(store.summary_fetches(), 3);
}

#[tokio::test]
async fn test_empty_snapshot_always_refetches() {
    let store = MockTransactionStore::new().with_summary(summary_for("carol", Vec::new()));
    let engine = memory_engine(&store);

    let view = engine.dashboard("carol").await.unwrap();
    engine.dashboard("carol").await.unwrap();

    assert_eq!(store.summary_fetches(), 2);
    assert_eq!(view.transaction_count, 0);
    assert_eq!(view.scores.overall, 0);
    assert_eq!(view.scores.savings, 0);
    assert_eq!(view.scores.spending, 0);
    assert_eq!(view.scores.balance_trend, 0);
}

#[tokio::test]
async fn test_file_cache_survives_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store =
        MockTransactionStore::new().with_summary(summary_for("alice", twenty_transactions("alice")));

    {
        let engine = BudgetEngine::new(
            store.clone(),
            KeywordCategorizer::new(),
            Arc::new(FileStore::new(dir.path())),
        );
        engine.load_summary("alice").await.unwrap();
    }

    let engine = BudgetEngine::new(
        store.clone(),
        KeywordCategorizer::new(),
        Arc::new(FileStore::new(dir.path())),
    );
    let summary = engine.load_summary("alice").await.unwrap();
    assert_eq!(summary.transactions.len(), 20);
    assert_eq!(store.summary_fetches(), 1);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_snapshot() {
    let store =
        MockTransactionStore::new().with_summary(summary_for("alice", twenty_transactions("alice")));
    let engine = memory_engine(&store);
    engine.load_summary("alice").await.unwrap();

    store.set_failing(true);
    // Still served from cache, no fetch attempted
    assert!(engine.load_summary("alice").await.is_ok());
    // A miss with the store down surfaces the error
    assert!(engine.load_report("alice").await.is_err());
    assert_eq!(engine.cache_entries().len(), 1);
}

// =============================================================================
// Report views
// =============================================================================

#[tokio::test]
async fn test_report_pagination_per_view() {
    let store = MockTransactionStore::new()
        .with_summary(summary_for("alice", twenty_transactions("alice")))
        .with_report(
            "alice",
            BudgetReport {
                recommendations: vec!["Automate savings".into()],
                alerts: vec!["Groceries over budget".into()],
                ..Default::default()
            },
        );
    let engine = memory_engine(&store);

    let mut cursors = PageCursors::default();
    let report = engine.report("alice", &cursors).await.unwrap();

    assert_eq!(report.expenses.total_pages, 1);
    assert_eq!(report.income.total_pages, 2);
    assert_eq!(report.all.total_pages, 3);
    assert_eq!(report.income.items.len(), 8);
    // Newest first
    assert_eq!(report.all.items[0].id, "t19");

    let income_pages = report.income.total_pages;
    cursors.next(View::Income, income_pages);
    let page_two = engine.report("alice", &cursors).await.unwrap();
    assert_eq!(page_two.income.page, 2);
    assert_eq!(page_two.income.items.len(), 4);
    // Other tabs keep their own cursor
    assert_eq!(page_two.all.page, 1);
    assert_eq!(page_two.expenses.page, 1);

    assert_eq!(page_two.total_income, 1200.0);
    assert_eq!(page_two.total_expenses, 800.0);
    assert_eq!(page_two.net_savings, 400.0);
    assert_eq!(page_two.savings_percentage, 33.3);
    assert_eq!(page_two.largest_expense_category.unwrap().category, "Groceries");
    assert_eq!(page_two.alerts, vec!["Groceries over budget".to_string()]);
    assert_eq!(store.report_fetches(), 1);
}

// =============================================================================
// Add-transaction workflow
// =============================================================================

#[tokio::test]
async fn test_add_transaction_invalidates_and_refetches() {
    let store =
        MockTransactionStore::new().with_summary(summary_for("alice", twenty_transactions("alice")));
    let engine = memory_engine(&store);

    engine.load_summary("alice").await.unwrap();
    engine.load_report("alice").await.unwrap();
    assert_eq!(engine.cache_entries().len(), 2);

    let created = engine
        .add_transaction(&draft("alice", "Uber to airport", 35.0))
        .await
        .unwrap();
    assert_eq!(created.category, "Transport");
    assert!(engine.cache_entries().is_empty());

    let summary = engine.load_summary("alice").await.unwrap();
    let report = engine.load_report("alice").await.unwrap();
    assert_eq!(summary.transactions.len(), 21);
    assert_eq!(report.transactions.len(), 21);
    assert_eq!(store.summary_fetches(), 2);
    assert_eq!(store.report_fetches(), 2);
}

#[tokio::test]
async fn test_invalid_draft_touches_nothing() {
    let store =
        MockTransactionStore::new().with_summary(summary_for("alice", twenty_transactions("alice")));
    let engine = memory_engine(&store);
    engine.load_summary("alice").await.unwrap();

    let err = engine
        .add_transaction(&draft("alice", "Coffee", 0.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(engine.categorizer().calls(), 0);
    assert_eq!(store.creates(), 0);
    assert_eq!(engine.cache_entries().len(), 1);
}
