//! Financial health scores
//!
//! All scores are integers in `[0, 100]` computed from a
//! [`TransactionSummary`] alone:
//!
//! - **savings**: `200 * (income - expense) / income`, so a 50% savings rate
//!   earns full marks. No income scores 0.
//! - **spending**: `100 * (1 - expense / income)`. Spending all of the income
//!   or more scores 0, as does no income.
//! - **balance trend**: `50 + 50 * (balance - previous) / |previous|`. A
//!   zero previous balance has nothing to compare against and scores 50.
//! - **overall**: `0.4 * savings + 0.3 * spending + 0.3 * balance trend`.
//!
//! A summary with no transactions scores 0 everywhere, whatever its totals say.

use serde::{Deserialize, Serialize};

use crate::models::TransactionSummary;

/// Savings rate that earns a full savings score
pub const TARGET_SAVINGS_RATE: f64 = 0.5;

/// Balance trend score when there is no previous balance
pub const NEUTRAL_TREND_SCORE: u8 = 50;

const SAVINGS_WEIGHT: f64 = 0.4;
const SPENDING_WEIGHT: f64 = 0.3;
const TREND_WEIGHT: f64 = 0.3;

/// The four health scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub overall: u8,
    pub savings: u8,
    pub spending: u8,
    pub balance_trend: u8,
}

/// Compute every score for a summary
pub fn score(summary: &TransactionSummary) -> ScoreSet {
    if summary.transactions.is_empty() {
        return ScoreSet::default();
    }

    let savings = savings_score(summary);
    let spending = spending_score(summary);
    let balance_trend = balance_trend_score(summary);

    ScoreSet {
        overall: overall_score(savings, spending, balance_trend),
        savings,
        spending,
        balance_trend,
    }
}

/// Rewards a higher share of income kept
pub fn savings_score(summary: &TransactionSummary) -> u8 {
    if summary.income <= 0.0 {
        return 0;
    }
    let rate = summary.net_savings() / summary.income;
    to_score(rate / TARGET_SAVINGS_RATE * 100.0)
}

/// Penalises spending a larger share of income
pub fn spending_score(summary: &TransactionSummary) -> u8 {
    if summary.income <= 0.0 {
        return 0;
    }
    let ratio = summary.expense.abs() / summary.income;
    to_score((1.0 - ratio) * 100.0)
}

/// Rewards growth of the balance over the previous period
pub fn balance_trend_score(summary: &TransactionSummary) -> u8 {
    if summary.previous_balance == 0.0 {
        return NEUTRAL_TREND_SCORE;
    }
    let change = (summary.balance - summary.previous_balance) / summary.previous_balance.abs();
    to_score(50.0 + change * 50.0)
}

/// Weighted blend of the component scores
pub fn overall_score(savings: u8, spending: u8, balance_trend: u8) -> u8 {
    to_score(
        SAVINGS_WEIGHT * f64::from(savings)
            + SPENDING_WEIGHT * f64::from(spending)
            + TREND_WEIGHT * f64::from(balance_trend),
    )
}

/// Round and clamp to `[0, 100]`; anything non-finite is 0
fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
