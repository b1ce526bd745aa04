//! Transaction commands (add)

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime};
use fino_core::{
    models::wire::parse_datetime, BudgetEngine, Categorizer, TransactionDraft, TransactionStore,
    TransactionType,
};

use super::format_signed_amount;

pub async fn cmd_add<S, C>(
    engine: &BudgetEngine<S, C>,
    user: &str,
    reason: &str,
    amount: f64,
    transaction_type: &str,
    date: Option<&str>,
) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    let draft = build_draft(user, reason, amount, transaction_type, date)?;

    println!("🏷️  Categorizing with {}...", engine.categorizer().name());
    let created = engine
        .add_transaction(&draft)
        .await
        .context("Failed to add transaction")?;

    println!(
        "✅ Added {} {} \"{}\" as {}",
        created.transaction_type,
        format_signed_amount(&created),
        created.reason,
        created.category
    );
    println!("   Id: {}", created.id);
    Ok(())
}

/// Parse command-line input into a draft
///
/// Only the parsing happens here; the engine validates the draft.
pub fn build_draft(
    user: &str,
    reason: &str,
    amount: f64,
    transaction_type: &str,
    date: Option<&str>,
) -> Result<TransactionDraft> {
    let transaction_type: TransactionType =
        transaction_type.parse().map_err(|e: String| anyhow!(e))?;
    let date = parse_date_arg(date)?;

    Ok(TransactionDraft {
        user_id: user.to_string(),
        date: Some(date),
        reason: reason.to_string(),
        amount,
        transaction_type,
    })
}

/// `--date` value, or the local time now
pub fn parse_date_arg(date: Option<&str>) -> Result<NaiveDateTime> {
    match date {
        Some(raw) => parse_datetime(raw).ok_or_else(|| {
            anyhow!(
                "Invalid date '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
                raw
            )
        }),
        None => Ok(Local::now().naive_local()),
    }
}
