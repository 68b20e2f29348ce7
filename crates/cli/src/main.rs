//! Megashop CLI - Database migrations and shop moderation.
//!
//! # Usage
//!
//! ```bash
//! # Run vendor API database migrations
//! megashop migrate
//!
//! # List shops awaiting approval
//! megashop shop pending
//!
//! # Delete expired vendor sessions
//! megashop sessions purge
//!
//! # Approve or reject a shop
//! megashop shop approve 7c9e6679-7425-40de-944b-e07fc1f90ae7
//! megashop shop reject 7c9e6679-7425-40de-944b-e07fc1f90ae7 --reason "Incomplete billing details"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "megashop")]
#[command(author, version, about = "Megashop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run vendor API database migrations
    Migrate,
    /// Moderate vendor shops
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Manage vendor sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// Delete expired sessions
    Purge,
}

#[derive(Subcommand)]
enum ShopAction {
    /// List shops awaiting approval, newest first
    Pending,
    /// Approve a pending shop
    Approve {
        /// Shop ID (UUID)
        id: String,
    },
    /// Reject a shop
    Reject {
        /// Shop ID (UUID)
        id: String,

        /// Reason shown to the vendor
        #[arg(short, long)]
        reason: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Shop { action } => match action {
            ShopAction::Pending => commands::shop::pending().await?,
            ShopAction::Approve { id } => commands::shop::approve(&id).await?,
            ShopAction::Reject { id, reason } => commands::shop::reject(&id, reason).await?,
        },
        Commands::Sessions { action } => match action {
            SessionsAction::Purge => commands::sessions::purge().await?,
        },
    }
    Ok(())
}
