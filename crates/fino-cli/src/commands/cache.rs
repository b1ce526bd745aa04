//! Snapshot cache commands (status, clear)

use anyhow::Result;
use fino_core::{BudgetEngine, CacheEntry, Categorizer, TransactionStore};

pub fn cmd_cache_status<S, C>(engine: &BudgetEngine<S, C>) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    print!("{}", render_cache_status(&engine.cache_entries()));
    Ok(())
}

pub fn cmd_cache_clear<S, C>(engine: &BudgetEngine<S, C>) -> Result<()>
where
    S: TransactionStore,
    C: Categorizer,
{
    let cleared = engine.cache_entries().len();
    engine.invalidate();
    println!("🗑️  Cleared {} cached snapshot(s)", cleared);
    Ok(())
}

pub fn render_cache_status(entries: &[CacheEntry]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("📦 Snapshot Cache\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");

    if entries.is_empty() {
        out.push_str("   (empty)\n\n");
        return out;
    }

    for entry in entries {
        out.push_str(&format!(
            "   {:<8} user {:<16} {:>4} tx  fetched {}\n",
            entry.key,
            entry.owner_id,
            entry.transaction_count,
            entry.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out.push('\n');
    out
}
