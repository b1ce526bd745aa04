//! Presentation-ready views
//!
//! Pure functions from fetched data to what the dashboard and report screens
//! show. Nothing here talks to the network or the cache.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{category_totals, group_by_category, largest_category, CategoryTotal};
use crate::models::{BudgetReportResponse, TransactionSummary, TransactionType};
use crate::paginate::{PageCursors, PageView, TransactionViews, View};
use crate::scoring::{score, ScoreSet};

/// Which way a figure moved since the previous period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Period-over-period change of one figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentChange {
    pub percent: f64,
    pub direction: Direction,
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}%", self.percent)
    }
}

/// Change from `previous` to `current`, relative to `|previous|`
///
/// None when there is no previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> Option<PercentChange> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    let percent = (current - previous) / previous.abs() * 100.0;
    let direction = if percent > 0.0 {
        Direction::Up
    } else if percent < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    };
    Some(PercentChange { percent, direction })
}

/// Headline figures and health scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub user_id: String,
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    pub balance_change: Option<PercentChange>,
    pub income_change: Option<PercentChange>,
    pub expense_change: Option<PercentChange>,
    pub scores: ScoreSet,
    pub transaction_count: usize,
}

impl DashboardView {
    pub fn build(summary: &TransactionSummary) -> Self {
        Self {
            user_id: summary.user_id.clone(),
            balance: summary.balance,
            income: summary.income,
            expense: summary.expense,
            balance_change: percent_change(summary.balance, summary.previous_balance),
            income_change: percent_change(summary.income, summary.previous_income),
            expense_change: percent_change(summary.expense, summary.previous_expense),
            scores: score(summary),
            transaction_count: summary.transactions.len(),
        }
    }
}

/// Paginated transaction tabs plus category breakdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub all: PageView,
    pub expenses: PageView,
    pub income: PageView,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub largest_expense_category: Option<CategoryTotal>,
    pub total_expenses: f64,
    pub total_income: f64,
    pub net_savings: f64,
    pub savings_percentage: f64,
    pub recommendations: Vec<String>,
    pub alerts: Vec<String>,
}

impl ReportView {
    pub fn build(response: &BudgetReportResponse, cursors: &PageCursors, page_size: usize) -> Self {
        let views = TransactionViews::new(&response.transactions, page_size);
        let buckets = group_by_category(&response.transactions);
        let summary = &response.budget_report.summary;

        Self {
            all: views.page_for(View::All, cursors),
            expenses: views.page_for(View::Expenses, cursors),
            income: views.page_for(View::Income, cursors),
            expense_by_category: category_totals(&buckets, TransactionType::Expense),
            income_by_category: category_totals(&buckets, TransactionType::Income),
            largest_expense_category: largest_category(&buckets, TransactionType::Expense),
            total_expenses: summary.total_expense,
            total_income: summary.total_income,
            net_savings: summary.net_savings,
            savings_percentage: savings_percentage(summary.net_savings, summary.total_income),
            recommendations: response.budget_report.recommendations.clone(),
            alerts: response.budget_report.alerts.clone(),
        }
    }

    pub fn page(&self, view: View) -> &PageView {
        match view {
            View::All => &self.all,
            View::Expenses => &self.expenses,
            View::Income => &self.income,
        }
    }
}

/// Share of income saved, as a percentage to one decimal
pub fn savings_percentage(net_savings: f64, total_income: f64) -> f64 {
    if total_income <= 0.0 || !net_savings.is_finite() {
        return 0.0;
    }
    (net_savings / total_income * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wire::parse_datetime;
    use crate::models::{BudgetReport, ReportSummary, Transaction};

    fn tx(id: usize, category: &str, amount: f64, transaction_type: TransactionType) -> Transaction {
        let date = parse_datetime(&format!("2024-03-{:02}", id % 28 + 1)).unwrap();
        Transaction {
            id: id.to_string(),
            user_id: "alice".into(),
            date,
            amount,
            reason: format!("tx {}", id),
            category: category.into(),
            transaction_type,
            created_at: date,
        }
    }

    #[test]
    fn test_percent_change() {
        let up = percent_change(500.0, 400.0).unwrap();
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.to_string(), "+25.00%");

        let down = percent_change(500.0, 600.0).unwrap();
        assert_eq!(down.direction, Direction::Down);
        assert_eq!(down.to_string(), "-16.67%");

        assert_eq!(percent_change(10.0, 10.0).unwrap().direction, Direction::Flat);
        assert!(percent_change(10.0, 0.0).is_none());
    }

    #[test]
    fn test_percent_change_negative_previous() {
        // -100 -> -50 is an improvement
        let change = percent_change(-50.0, -100.0).unwrap();
        assert_eq!(change.direction, Direction::Up);
        assert_eq!(change.percent, 50.0);
    }

    #[test]
    fn test_savings_percentage() {
        assert_eq!(savings_percentage(500.0, 2000.0), 25.0);
        assert_eq!(savings_percentage(1.0, 3.0), 33.3);
        assert_eq!(savings_percentage(-300.0, 1000.0), -30.0);
        assert_eq!(savings_percentage(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_dashboard_view() {
        let summary = TransactionSummary {
            user_id: "alice".into(),
            balance: 500.0,
            income: 2000.0,
            expense: 1500.0,
            previous_balance: 400.0,
            previous_income: 0.0,
            previous_expense: 1000.0,
            transactions: vec![tx(1, "Rent", 1500.0, TransactionType::Expense)],
        };
        let view = DashboardView::build(&summary);
        assert_eq!(view.transaction_count, 1);
        assert_eq!(view.balance_change.unwrap().to_string(), "+25.00%");
        assert!(view.income_change.is_none());
        assert_eq!(view.expense_change.unwrap().direction, Direction::Up);
        assert_eq!(view.scores, score(&summary));
    }

    #[test]
    fn test_report_view() {
        let mut transactions: Vec<Transaction> = (0..8)
            .map(|i| {
                let category = if i % 2 == 0 { "Groceries" } else { "Dining" };
                tx(i, category, 10.0 + i as f64, TransactionType::Expense)
            })
            .collect();
        transactions.extend((8..20).map(|i| tx(i, "Salary", 100.0, TransactionType::Income)));

        let response = BudgetReportResponse {
            transactions,
            budget_report: BudgetReport {
                summary: ReportSummary {
                    total_income: 1200.0,
                    total_expense: 108.0,
                    net_savings: 1092.0,
                },
                recommendations: vec!["Keep it up".into()],
                alerts: vec![],
            },
        };

        let view = ReportView::build(&response, &PageCursors::default(), 8);
        assert_eq!(view.all.total_pages, 3);
        assert_eq!(view.expenses.total_pages, 1);
        assert_eq!(view.income.total_pages, 2);
        assert_eq!(view.page(View::Income).items.len(), 8);

        // Groceries: 10+12+14+16, Dining: 11+13+15+17
        let largest = view.largest_expense_category.unwrap();
        assert_eq!(largest.category, "Dining");
        assert_eq!(largest.amount, 56.0);
        assert_eq!(view.expense_by_category.len(), 2);
        assert_eq!(view.income_by_category[0].count, 12);
        assert_eq!(view.savings_percentage, 91.0);
        assert_eq!(view.recommendations, vec!["Keep it up".to_string()]);
    }
}
