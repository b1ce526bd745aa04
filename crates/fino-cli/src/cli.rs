//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fino - Budget analytics for your transactions
#[derive(Parser)]
#[command(name = "fino")]
#[command(about = "Budget dashboard, reports and health scores", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/fino/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose budget to show
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show balance, period changes and health scores
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the budget report with paginated transactions
    Report {
        /// Transaction tab to list: all, expenses, income
        #[arg(long, default_value = "all")]
        view: String,

        /// Page of the all tab
        #[arg(long, default_value = "1")]
        page_all: usize,

        /// Page of the expenses tab
        #[arg(long, default_value = "1")]
        page_expenses: usize,

        /// Page of the income tab
        #[arg(long, default_value = "1")]
        page_income: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a transaction (categorized automatically)
    Add {
        /// What the transaction was for
        #[arg(short, long)]
        reason: String,

        /// Amount (positive)
        #[arg(short, long)]
        amount: f64,

        /// Transaction type: expense or income
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,

        /// Date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, defaults to now)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Drop cached snapshots and fetch fresh data
    Refresh,

    /// Inspect or clear the local snapshot cache
    Cache {
        #[command(subcommand)]
        action: Option<CacheAction>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show what each cache slot holds (default)
    Status,
    /// Remove all cached snapshots
    Clear,
}
