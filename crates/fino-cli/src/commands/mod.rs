//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config loading, engine setup, user check)
//! - `cache` - Snapshot cache commands (status, clear)
//! - `dashboard` - Dashboard and refresh commands
//! - `report` - Budget report command
//! - `settings` - Effective configuration display
//! - `transactions` - Add-transaction command

pub mod cache;
pub mod core;
pub mod dashboard;
pub mod report;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use cache::*;
pub use core::*;
pub use dashboard::*;
pub use report::*;
pub use settings::*;
pub use transactions::*;

use fino_core::{PercentChange, Transaction};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// `$1,234.56`, with a leading minus for negatives
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Transaction amount with its direction sign (`-$4.50`, `+$3,200.00`)
pub fn format_signed_amount(tx: &Transaction) -> String {
    format!("{}{}", tx.transaction_type.sign(), format_money(tx.amount.abs()))
}

/// Period change, or n/a when there is nothing to compare against
pub fn format_change(change: Option<PercentChange>) -> String {
    match change {
        Some(change) => change.to_string(),
        None => "n/a".to_string(),
    }
}

/// Ten-cell bar for a 0-100 score
pub fn score_bar(score: u8) -> String {
    let filled = (usize::from(score.min(100)) + 5) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
