//! # Fundsync
//!
//! Campaign state synchronization client for an on-chain crowdfunding
//! ledger. The contract is the system of record; this crate is a stateless
//! sync and presentation client that normalizes the ledger's raw units and
//! runs the create/donate write-and-refresh protocol.
//!
//! ## Modules
//!
//! - [`amount`]: base-unit / display-unit decimal conversion
//! - [`deadline`]: deadline parsing and time-remaining derivation
//! - [`progress`]: clamped funding percentage
//! - [`form`]: campaign form validation
//! - [`ledger`]: the gateway boundary to the remote contract
//! - [`campaign`]: the normalized campaign model
//! - [`repository`]: cached campaign list and write protocol
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fundsync::{CampaignRepository, HttpLedgerGateway, LedgerConfig, SyncConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Arc::new(HttpLedgerGateway::new(LedgerConfig::default())?);
//!     let repository = CampaignRepository::new(gateway, SyncConfig::default());
//!
//!     let campaigns = repository.refresh().await?;
//!     for campaign in &campaigns {
//!         println!("{}: {:.1}% funded", campaign.title, campaign.progress());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod amount;
pub mod campaign;
pub mod config;
pub mod deadline;
pub mod form;
pub mod ledger;
pub mod progress;
pub mod repository;

// Re-export top-level types for convenience
pub use amount::{AmountError, AmountSource};

pub use campaign::{Campaign, CampaignStatus, NormalizeError};

pub use config::{Config, ConfigError, LedgerSettings, LoggingConfig, SyncSettings};

pub use deadline::{DeadlineError, DeadlineSource, TimeRemaining};

pub use form::{CampaignForm, ValidatedForm, ValidationError};

pub use ledger::{
    CreateRequest, GatewayError, HttpLedgerGateway, LedgerConfig, LedgerGateway, RawCampaign,
    TransactionReceipt,
};

pub use repository::{CampaignRepository, RepositoryError, SyncConfig, WriteState};
