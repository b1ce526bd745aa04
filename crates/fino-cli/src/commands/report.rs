//! Budget report command

use anyhow::{anyhow, Context, Result};
use fino_core::{
    BudgetEngine, BudgetReportResponse, Categorizer, PageCursors, PageView, ReportView,
    TransactionStore, TransactionViews, View,
};

use super::{format_money, format_signed_amount, truncate};

/// Pages asked for on the command line, one per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedPages {
    pub all: usize,
    pub expenses: usize,
    pub income: usize,
}

pub async fn cmd_report<S, C>(
    engine: &BudgetEngine<S, C>,
    user: &str,
    view: &str,
    pages: RequestedPages,
    json: bool,
) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    let view: View = view.parse().map_err(|e: String| anyhow!(e))?;

    let response = engine
        .load_report(user)
        .await
        .with_context(|| format!("Failed to load report for {}", user))?;
    let cursors = clamp_cursors(&response, engine.page_size(), pages);
    let report = ReportView::build(&response, &cursors, engine.page_size());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, view));
    }
    Ok(())
}

/// Cursors for the requested pages, each kept within its tab's page count
pub fn clamp_cursors(
    response: &BudgetReportResponse,
    page_size: usize,
    pages: RequestedPages,
) -> PageCursors {
    let views = TransactionViews::new(&response.transactions, page_size);
    let mut cursors = PageCursors::default();
    for (view, page) in [
        (View::All, pages.all),
        (View::Expenses, pages.expenses),
        (View::Income, pages.income),
    ] {
        cursors.set(view, page, views.total_pages(view));
    }
    cursors
}

pub fn render_report(report: &ReportView, view: View) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("📊 Budget Report\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!("   Income:       {:>14}\n", format_money(report.total_income)));
    out.push_str(&format!("   Expenses:     {:>14}\n", format_money(report.total_expenses)));
    out.push_str(&format!(
        "   Net savings:  {:>14}  ({:.1}% of income)\n",
        format_money(report.net_savings),
        report.savings_percentage
    ));

    if let Some(ref largest) = report.largest_expense_category {
        out.push_str(&format!(
            "   Largest expense category: {} ({})\n",
            largest.category,
            format_money(largest.amount)
        ));
    }

    if !report.expense_by_category.is_empty() {
        out.push_str("\n   💸 Expenses by category\n");
        for total in &report.expense_by_category {
            out.push_str(&format!(
                "      {:<24} {:>14}  ({} tx)\n",
                truncate(&total.category, 24),
                format_money(total.amount),
                total.count
            ));
        }
    }
    if !report.income_by_category.is_empty() {
        out.push_str("\n   💵 Income by category\n");
        for total in &report.income_by_category {
            out.push_str(&format!(
                "      {:<24} {:>14}  ({} tx)\n",
                truncate(&total.category, 24),
                format_money(total.amount),
                total.count
            ));
        }
    }

    out.push('\n');
    out.push_str(&render_page(report.page(view)));

    if !report.alerts.is_empty() {
        out.push_str("\n   ⚠️  Alerts\n");
        for alert in &report.alerts {
            out.push_str(&format!("      • {}\n", alert));
        }
    }
    if !report.recommendations.is_empty() {
        out.push_str("\n   💡 Recommendations\n");
        for recommendation in &report.recommendations {
            out.push_str(&format!("      • {}\n", recommendation));
        }
    }
    out.push('\n');
    out
}

/// One tab of transactions with its page indicator
pub fn render_page(page: &PageView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "   🧾 Transactions ({}) page {}/{}, {} total\n",
        page.view, page.page, page.total_pages, page.total_items
    ));

    if page.items.is_empty() {
        out.push_str("      (none)\n");
        return out;
    }

    for tx in &page.items {
        out.push_str(&format!(
            "      {}  {:<28} {:<16} {:>14}\n",
            tx.date.format("%Y-%m-%d"),
            truncate(&tx.reason, 28),
            truncate(&tx.category, 16),
            format_signed_amount(tx)
        ));
    }

    let mut hints = Vec::new();
    if page.has_previous() {
        hints.push(format!("--page-{} {}", page.view, page.page - 1));
    }
    if page.has_next() {
        hints.push(format!("--page-{} {}", page.view, page.page + 1));
    }
    if !hints.is_empty() {
        out.push_str(&format!("      More: {}\n", hints.join(" | ")));
    }
    out
}
