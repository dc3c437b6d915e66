//! Campaign Repository
//!
//! Composes the ledger gateway with amount/deadline normalization to hold
//! the single in-memory campaign list and run the create/donate
//! write-and-refresh protocol.
//!
//! Write protocol: `Idle -> Submitting -> Confirming -> Idle`. A write that
//! fails at any step returns to `Idle` with the cached list untouched. One
//! write at a time; reads stay re-entrant throughout.

use crate::amount::{self, AmountError};
use crate::campaign::{Campaign, NormalizeError};
use crate::form::{self, CampaignForm, ValidationError};
use crate::ledger::{CreateRequest, GatewayError, LedgerGateway, TransactionReceipt};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Tuning for the repository's write protocol
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Decimal places of the ledger's token (18 for wei/ether)
    pub token_decimals: u32,
    /// Wait after a create submission before re-reading
    pub create_confirmation_ms: u64,
    /// Wait after a donate submission before re-reading. Longer than the
    /// create wait: the donation total is read back immediately afterwards
    pub donate_confirmation_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            token_decimals: 18,
            create_confirmation_ms: 3_000,
            donate_confirmation_ms: 5_000,
        }
    }
}

/// Write protocol state. A second write while not `Idle` is rejected rather
/// than queued: two in-flight writes from one account risk nonce conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    Submitting,
    Confirming,
}

/// Errors surfaced by repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// One or more form rules violated; nothing was sent to the network
    #[error("{} validation rule(s) violated", .0.len())]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A ledger record could not be normalized
    #[error("bad ledger record: {0}")]
    Normalize(#[from] NormalizeError),

    /// A gateway call failed, wrapped with the operation it belonged to
    #[error("{operation} failed: {source}")]
    Gateway {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// Another create/donate is already in flight
    #[error("another write is already in flight")]
    OperationInProgress,
}

/// Single source of "current campaigns" and the only component that runs
/// the write protocol.
pub struct CampaignRepository {
    gateway: Arc<dyn LedgerGateway>,
    config: SyncConfig,
    campaigns: RwLock<Vec<Campaign>>,
    // std Mutex rather than an async lock: it is only ever held for a field
    // read/write, and the release path must work from Drop.
    write_state: Arc<Mutex<WriteState>>,
}

impl CampaignRepository {
    /// Create a repository over the given gateway
    pub fn new(gateway: Arc<dyn LedgerGateway>, config: SyncConfig) -> Self {
        Self {
            gateway,
            config,
            campaigns: RwLock::new(Vec::new()),
            write_state: Arc::new(Mutex::new(WriteState::Idle)),
        }
    }

    /// Snapshot of the cached campaign list
    pub async fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.read().await.clone()
    }

    /// Current write protocol state
    pub fn write_state(&self) -> WriteState {
        *lock_state(&self.write_state)
    }

    /// Re-read every campaign from the ledger and replace the cached list
    /// wholesale. Re-entrant; safe to call while a write is in flight.
    pub async fn refresh(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let raw = self
            .gateway
            .read_all()
            .await
            .map_err(|source| RepositoryError::Gateway {
                operation: "read campaigns",
                source,
            })?;

        let mut normalized = Vec::with_capacity(raw.len());
        for record in &raw {
            normalized.push(Campaign::from_raw(record, self.config.token_decimals)?);
        }

        let mut cache = self.campaigns.write().await;
        *cache = normalized.clone();
        drop(cache);

        tracing::debug!(count = normalized.len(), "campaign list refreshed");
        Ok(normalized)
    }

    /// Validate, normalize and submit a new campaign, then wait for
    /// confirmation and re-read the ledger.
    ///
    /// The submission happens exactly once; retries are the caller's call.
    pub async fn create(&self, form: &CampaignForm) -> Result<TransactionReceipt, RepositoryError> {
        // Local rules first; a rejected form never reaches the network.
        let validated = form::validate(form, self.config.token_decimals)
            .map_err(RepositoryError::Validation)?;

        let owner = self
            .gateway
            .account()
            .ok_or(RepositoryError::Gateway {
                operation: "create campaign",
                source: GatewayError::NoAccount,
            })?
            .to_string();

        let guard = WriteGuard::acquire(&self.write_state)?;

        let request = CreateRequest {
            owner,
            title: validated.title,
            description: validated.description,
            target_base_units: validated.target_base_units,
            deadline_epoch_seconds: validated.deadline.timestamp(),
            image: validated.image.unwrap_or_default(),
        };

        tracing::info!(
            title = %request.title,
            target = %request.target_base_units,
            "submitting campaign"
        );

        let receipt = self
            .gateway
            .submit_create(&request)
            .await
            .map_err(|source| RepositoryError::Gateway {
                operation: "create campaign",
                source,
            })?;

        guard.confirming();
        tokio::time::sleep(Duration::from_millis(self.config.create_confirmation_ms)).await;
        self.refresh().await?;

        tracing::info!(tx = %receipt.transaction_hash, "campaign created");
        Ok(receipt)
    }

    /// Normalize and submit a donation, then wait for confirmation and
    /// re-read the ledger.
    pub async fn donate(
        &self,
        campaign_index: u32,
        amount: &str,
    ) -> Result<TransactionReceipt, RepositoryError> {
        let base_units = amount::to_base_units(amount, self.config.token_decimals)?;
        if base_units == 0 {
            return Err(RepositoryError::Amount(AmountError::InvalidAmount(format!(
                "donation of {} is below one base unit",
                amount
            ))));
        }

        let guard = WriteGuard::acquire(&self.write_state)?;

        tracing::info!(campaign = campaign_index, amount = %base_units, "submitting donation");

        let receipt = self
            .gateway
            .submit_donate(campaign_index, base_units)
            .await
            .map_err(|source| RepositoryError::Gateway {
                operation: "donate",
                source,
            })?;

        guard.confirming();
        tokio::time::sleep(Duration::from_millis(self.config.donate_confirmation_ms)).await;
        self.refresh().await?;

        tracing::info!(tx = %receipt.transaction_hash, "donation confirmed");
        Ok(receipt)
    }
}

/// Holds the write slot. Dropping it returns the repository to `Idle`, so a
/// cancelled write future can never wedge the protocol.
struct WriteGuard {
    state: Arc<Mutex<WriteState>>,
}

impl WriteGuard {
    fn acquire(state: &Arc<Mutex<WriteState>>) -> Result<Self, RepositoryError> {
        let mut slot = lock_state(state);
        if *slot != WriteState::Idle {
            return Err(RepositoryError::OperationInProgress);
        }
        *slot = WriteState::Submitting;
        drop(slot);

        Ok(Self {
            state: Arc::clone(state),
        })
    }

    fn confirming(&self) {
        *lock_state(&self.state) = WriteState::Confirming;
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        *lock_state(&self.state) = WriteState::Idle;
    }
}

fn lock_state(state: &Mutex<WriteState>) -> std::sync::MutexGuard<'_, WriteState> {
    // A poisoned state lock only means a panic elsewhere; the value itself
    // is always a plain enum.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
