//! Voltlane CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vl-cli migrate
//!
//! # Seed the database with demo catalog data
//! vl-cli seed
//!
//! # Grant a dashboard role to a profile
//! vl-cli profile grant -e admin@example.com -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo data
//! - `profile grant` - Create or update a profile's role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vl-cli")]
#[command(author, version, about = "Voltlane CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed database with demo catalog data
    Seed,
    /// Manage dashboard profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Grant a role to a profile, creating the profile if needed
    Grant {
        /// Profile email address
        #[arg(short, long)]
        email: String,

        /// Dashboard role (`admin`, `manager`, `staff`)
        #[arg(short, long, default_value = "staff")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Profile { action } => match action {
            ProfileAction::Grant { email, role } => {
                commands::profile::grant(&email, &role).await?;
            }
        },
    }
    Ok(())
}
