//! Fino CLI - Budget analytics client
//!
//! Usage:
//!   fino --user alice dashboard                 Balance, changes and scores
//!   fino --user alice report --view income      Paginated budget report
//!   fino --user alice add -r "Coffee" -a 4.5    Add a categorized transaction
//!   fino cache status                           Inspect the snapshot cache

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
        Commands::Cache { action } => {
            let engine = commands::open_engine(&config)?;
            match action {
                None | Some(CacheAction::Status) => commands::cmd_cache_status(&engine),
                Some(CacheAction::Clear) => commands::cmd_cache_clear(&engine),
            }
        }
        Commands::Dashboard { json } => {
            let engine = commands::open_engine(&config)?;
            let user = commands::require_user(cli.user.as_deref())?;
            commands::cmd_dashboard(&engine, user, json).await
        }
        Commands::Report {
            view,
            page_all,
            page_expenses,
            page_income,
            json,
        } => {
            let engine = commands::open_engine(&config)?;
            let user = commands::require_user(cli.user.as_deref())?;
            let pages = commands::RequestedPages {
                all: page_all,
                expenses: page_expenses,
                income: page_income,
            };
            commands::cmd_report(&engine, user, &view, pages, json).await
        }
        Commands::Add {
            reason,
            amount,
            transaction_type,
            date,
        } => {
            let engine = commands::open_engine(&config)?;
            let user = commands::require_user(cli.user.as_deref())?;
            commands::cmd_add(
                &engine,
                user,
                &reason,
                amount,
                &transaction_type,
                date.as_deref(),
            )
            .await
        }
        Commands::Refresh => {
            let engine = commands::open_engine(&config)?;
            let user = commands::require_user(cli.user.as_deref())?;
            commands::cmd_refresh(&engine, user).await
        }
    }
}
