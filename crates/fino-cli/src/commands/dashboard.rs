//! Dashboard and refresh commands

use anyhow::{Context, Result};
use fino_core::{BudgetEngine, Categorizer, DashboardView, TransactionStore};

use super::{format_change, format_money, score_bar};

pub async fn cmd_dashboard<S, C>(engine: &BudgetEngine<S, C>, user: &str, json: bool) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    let view = engine
        .dashboard(user)
        .await
        .with_context(|| format!("Failed to load dashboard for {}", user))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_dashboard(&view));
    }
    Ok(())
}

pub async fn cmd_refresh<S, C>(engine: &BudgetEngine<S, C>, user: &str) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    println!("🔄 Refreshing budget data for {}...", user);
    engine
        .refresh(user)
        .await
        .with_context(|| format!("Failed to refresh data for {}", user))?;
    println!("✅ Snapshots updated");
    Ok(())
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("╭─────────────────────────────────────────╮\n");
    out.push_str("│           💰 Fino Dashboard             │\n");
    out.push_str("╰─────────────────────────────────────────╯\n");
    out.push('\n');
    out.push_str(&format!("  User:          {}\n", view.user_id));
    out.push_str(&format!("  Transactions:  {}\n", view.transaction_count));
    out.push('\n');
    out.push_str(&format!(
        "  Balance:   {:>14}   {}\n",
        format_money(view.balance),
        format_change(view.balance_change)
    ));
    out.push_str(&format!(
        "  Income:    {:>14}   {}\n",
        format_money(view.income),
        format_change(view.income_change)
    ));
    out.push_str(&format!(
        "  Expenses:  {:>14}   {}\n",
        format_money(view.expense),
        format_change(view.expense_change)
    ));
    out.push('\n');
    out.push_str("  📈 Health Scores\n");
    let scores = &view.scores;
    for (label, score) in [
        ("Overall", scores.overall),
        ("Savings", scores.savings),
        ("Spending", scores.spending),
        ("Balance trend", scores.balance_trend),
    ] {
        out.push_str(&format!("     {:<14} {} {:>3}\n", label, score_bar(score), score));
    }
    out.push('\n');

    if view.transaction_count == 0 {
        out.push_str("  No transactions this period. Add one with 'fino add'.\n");
    }
    out
}
