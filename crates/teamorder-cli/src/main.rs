use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config_check;
mod invoice;
mod preview;
mod report;
mod source;

#[derive(Debug, Parser)]
#[command(name = "teamorder")]
#[command(about = "Tier-priced team order invoicing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price the batch and print tiers, exclusions and per-customer totals
    Preview {
        /// Read order rows from a CSV file instead of the order store
        #[arg(long)]
        input: Option<PathBuf>,
        /// Treat every combination as eligible regardless of the minimum
        #[arg(long)]
        ignore_minimum: bool,
        /// Only show this customer's invoice
        #[arg(long)]
        customer: Option<String>,
    },
    /// Create one invoice per customer in the invoicing API
    Invoice {
        /// Read order rows from a CSV file instead of the order store
        #[arg(long)]
        input: Option<PathBuf>,
        /// Only invoice this customer
        #[arg(long)]
        customer: Option<String>,
        /// Email each finalized invoice to the customer
        #[arg(long)]
        send: bool,
        /// Print the invoice requests as JSON without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Pricing configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Load and validate the pricing file
    Check {
        /// Pricing file to check (defaults to TEAMORDER_PRICING_PATH)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = teamorder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview {
            input,
            ignore_minimum,
            customer,
        } => {
            preview::run_preview(&config, input.as_deref(), ignore_minimum, customer.as_deref())
                .await?;
        }
        Commands::Invoice {
            input,
            customer,
            send,
            dry_run,
        } => {
            invoice::run_invoice(
                &config,
                &invoice::InvoiceOptions {
                    input,
                    customer,
                    send,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Config {
            command: ConfigCommands::Check { path },
        } => {
            config_check::run_config_check(path.as_deref().unwrap_or(&config.pricing_path))?;
        }
    }

    Ok(())
}
