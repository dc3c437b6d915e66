//! Fundsync CLI
//!
//! Command-line client for the crowdfunding ledger:
//! - List campaigns with funding progress and time remaining
//! - Create a campaign
//! - Donate to a campaign
//! - Generate a default config file

use chrono::Utc;
use clap::{Parser, Subcommand};
use fundsync::campaign::{format_display_amount, short_address};
use fundsync::config::{self, Config, LoggingConfig};
use fundsync::{CampaignForm, CampaignRepository, HttpLedgerGateway, RepositoryError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fundsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Campaign sync client for an on-chain crowdfunding ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List campaigns with progress and time remaining
    List,

    /// Create a new campaign
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Funding target in display units (e.g. "2.5")
        #[arg(long)]
        target: String,
        /// Deadline: ISO datetime, epoch seconds, or epoch milliseconds
        #[arg(long)]
        deadline: String,
        /// Image URL (optional; a placeholder is derived from the title)
        #[arg(long)]
        image: Option<String>,
    },

    /// Donate to a campaign by index
    Donate {
        /// Campaign index as listed
        index: u32,
        /// Amount in display units (e.g. "0.001")
        amount: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Config { output } => {
            let contents = config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, contents)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", contents),
            }
        }

        Commands::List => {
            let repository = build_repository(&config)?;
            let campaigns = repository.refresh().await?;
            if campaigns.is_empty() {
                println!("No campaigns yet.");
                return Ok(());
            }

            let now = Utc::now();
            for (index, campaign) in campaigns.iter().enumerate() {
                let remaining = campaign.time_remaining(now)?;
                let status = campaign.status(now)?;
                println!("[{}] {} ({})", index, campaign.title, status);
                println!(
                    "    owner {}  raised {} / {}  {:.1}%  {}  {} donation(s)",
                    short_address(&campaign.owner),
                    format_display_amount(&campaign.amount_collected),
                    format_display_amount(&campaign.target),
                    campaign.progress(),
                    remaining.formatted,
                    campaign.donors.len(),
                );
            }
        }

        Commands::Create {
            title,
            description,
            target,
            deadline,
            image,
        } => {
            let repository = build_repository(&config)?;
            let form = CampaignForm {
                title,
                description,
                target,
                deadline,
                image,
            };
            match repository.create(&form).await {
                Ok(receipt) => println!("Campaign created: tx {}", receipt.transaction_hash),
                Err(RepositoryError::Validation(errors)) => {
                    eprintln!("Form rejected:");
                    for error in &errors {
                        eprintln!("  - {}", error);
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Donate { index, amount } => {
            let repository = build_repository(&config)?;
            let receipt = repository.donate(index, &amount).await?;
            println!("Donation sent: tx {}", receipt.transaction_hash);
        }
    }

    Ok(())
}

fn build_repository(config: &Config) -> anyhow::Result<CampaignRepository> {
    let gateway = Arc::new(HttpLedgerGateway::new(config.ledger.to_ledger_config())?);
    Ok(CampaignRepository::new(gateway, config.sync.to_sync_config()))
}

fn init_logging(logging: &LoggingConfig) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| format!("fundsync={}", logging.level));
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
