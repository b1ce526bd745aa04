//! Test utilities for fino-core
//!
//! This module provides a mock budget API server that speaks the same routes
//! as the real service, for the HTTP client tests and local development.
//!
//! Seeded data: user `alice` has a small, consistent month of transactions.
//! Any other user is a 404.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::oneshot;

use crate::categorizer::categorize_by_keyword;
use crate::models::{
    wire::parse_datetime, BudgetReport, BudgetReportResponse, CategorizeRequest, Categorization,
    NewTransaction, ReportSummary, Transaction, TransactionSummary, TransactionType,
};

/// User the mock server knows about
pub const MOCK_USER: &str = "alice";

type SharedSummary = Arc<Mutex<TransactionSummary>>;

/// Mock budget API server for testing and development
pub struct MockApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockApiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: SharedSummary = Arc::new(Mutex::new(seed_summary()));
        let app = Router::new()
            .route("/budget/transactions/summary/:user_id", get(handle_summary))
            .route("/budget/report/:user_id", get(handle_report))
            .route("/budget/transactions", post(handle_create))
            .route("/budget/categorize", post(handle_categorize))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn seed_summary() -> TransactionSummary {
    let rows = [
        ("2024-04-01 09:00:00", 3200.0, "April salary", "Salary", TransactionType::Income),
        ("2024-04-02 18:30:00", 1200.0, "Rent", "Housing", TransactionType::Expense),
        ("2024-04-05 12:15:00", 86.4, "Whole Foods", "Groceries", TransactionType::Expense),
        ("2024-04-09 08:05:00", 4.5, "Starbucks", "Dining", TransactionType::Expense),
        ("2024-04-12 20:00:00", 15.99, "Netflix", "Subscriptions", TransactionType::Expense),
        ("2024-04-15 10:00:00", 450.0, "Freelance invoice", "Freelance", TransactionType::Income),
    ];

    let transactions: Vec<Transaction> = rows
        .iter()
        .enumerate()
        .map(|(i, (date, amount, reason, category, transaction_type))| {
            let date = parse_datetime(date).unwrap();
            Transaction {
                id: (i + 1).to_string(),
                user_id: MOCK_USER.to_string(),
                date,
                amount: *amount,
                reason: reason.to_string(),
                category: category.to_string(),
                transaction_type: *transaction_type,
                created_at: date,
            }
        })
        .collect();

    let mut summary = TransactionSummary {
        user_id: MOCK_USER.to_string(),
        balance: 0.0,
        income: 0.0,
        expense: 0.0,
        previous_balance: 1900.0,
        previous_income: 3200.0,
        previous_expense: 1300.0,
        transactions: Vec::new(),
    };
    for tx in transactions {
        apply(&mut summary, tx);
    }
    summary
}

fn apply(summary: &mut TransactionSummary, tx: Transaction) {
    if tx.is_income() {
        summary.income += tx.amount;
    } else {
        summary.expense += tx.amount;
    }
    summary.balance = summary.income - summary.expense;
    summary.transactions.push(tx);
}

fn not_found(user_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("No transactions found for user {}", user_id),
    )
        .into_response()
}

async fn handle_summary(State(state): State<SharedSummary>, Path(user_id): Path<String>) -> Response {
    if user_id != MOCK_USER {
        return not_found(&user_id);
    }
    let summary = state.lock().unwrap().clone();
    Json(summary).into_response()
}

async fn handle_report(State(state): State<SharedSummary>, Path(user_id): Path<String>) -> Response {
    if user_id != MOCK_USER {
        return not_found(&user_id);
    }
    let summary = state.lock().unwrap().clone();

    let mut recommendations = vec!["Set aside part of each paycheck before spending".to_string()];
    let mut alerts = Vec::new();
    if summary.expense > summary.income * 0.8 {
        alerts.push("Spending is above 80% of income".to_string());
    } else {
        recommendations.push("Consider moving surplus savings to an interest-bearing account".into());
    }

    Json(BudgetReportResponse {
        budget_report: BudgetReport {
            summary: ReportSummary {
                total_income: summary.income,
                total_expense: summary.expense,
                net_savings: summary.net_savings(),
            },
            recommendations,
            alerts,
        },
        transactions: summary.transactions,
    })
    .into_response()
}

async fn handle_create(
    State(state): State<SharedSummary>,
    Json(request): Json<NewTransaction>,
) -> Response {
    if request.amount <= 0.0 || request.reason.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "invalid transaction").into_response();
    }

    let mut summary = state.lock().unwrap();
    let created = Transaction {
        id: (summary.transactions.len() + 1).to_string(),
        user_id: request.user_id,
        date: request.date,
        amount: request.amount,
        reason: request.reason,
        category: request.category,
        transaction_type: request.transaction_type,
        created_at: request.created_at,
    };
    if created.user_id == MOCK_USER {
        apply(&mut summary, created.clone());
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn handle_categorize(Json(request): Json<CategorizeRequest>) -> Response {
    if request.reason.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "reason is required").into_response();
    }
    Json(Categorization {
        category: categorize_by_keyword(&request.reason, request.transaction_type).to_string(),
    })
    .into_response()
}
