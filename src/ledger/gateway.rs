//! Ledger gateway trait and wire types
//!
//! Defines the contract-facing boundary: the raw record shape the contract
//! reports, the write requests, and the error taxonomy callers branch on
//! for recovery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw campaign record as reported by the contract.
///
/// Amounts are base-unit integers serialized as decimal digit strings (they
/// do not fit a JSON number); the deadline is epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCampaign {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub target: String,
    pub deadline: i64,
    pub amount_collected: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub donators: Vec<String>,
    #[serde(default)]
    pub donation_amounts: Vec<String>,
}

/// Arguments for a create-campaign write, already normalized to ledger units.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub target_base_units: u128,
    pub deadline_epoch_seconds: i64,
    pub image: String,
}

/// Acknowledgement of a state-changing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
}

/// Errors from ledger calls, distinguishable by recovery strategy
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No account is connected; writes cannot be signed.
    #[error("no connected account")]
    NoAccount,

    /// Transport-level failure (connect, timeout). Safe to retry.
    #[error("ledger unreachable: {0}")]
    NetworkUnavailable(String),

    /// The ledger itself refused the call (revert, bad arguments).
    /// Not blindly retryable.
    #[error("ledger rejected the call ({status}): {reason}")]
    RemoteRejected { status: u16, reason: String },
}

/// The sole component permitted to perform network I/O against the remote
/// contract. Owns the connected account.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Connected account address, if a wallet session exists.
    fn account(&self) -> Option<&str>;

    /// Read every campaign record. Side-effect free and freely retryable.
    async fn read_all(&self) -> Result<Vec<RawCampaign>, GatewayError>;

    /// Submit a create-campaign transaction. Attaches no value.
    async fn submit_create(
        &self,
        request: &CreateRequest,
    ) -> Result<TransactionReceipt, GatewayError>;

    /// Submit a donation, attaching `amount_base_units` as transferred value.
    async fn submit_donate(
        &self,
        campaign_index: u32,
        amount_base_units: u128,
    ) -> Result<TransactionReceipt, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_campaign_wire_format() {
        let json = r#"{
            "owner": "0xabc",
            "title": "Well",
            "description": "A village well",
            "target": "2500000000000000000",
            "deadline": 1769947200,
            "amountCollected": "1000000000000000",
            "image": "",
            "donators": ["0xdef"],
            "donationAmounts": ["1000000000000000"]
        }"#;

        let raw: RawCampaign = serde_json::from_str(json).unwrap();
        assert_eq!(raw.amount_collected, "1000000000000000");
        assert_eq!(raw.donation_amounts, vec!["1000000000000000"]);
        assert_eq!(raw.deadline, 1_769_947_200);
    }

    #[test]
    fn test_raw_campaign_optional_fields_default() {
        let json = r#"{
            "owner": "0xabc",
            "title": "Well",
            "description": "A village well",
            "target": "0",
            "deadline": 0,
            "amountCollected": "0"
        }"#;

        let raw: RawCampaign = serde_json::from_str(json).unwrap();
        assert!(raw.image.is_empty());
        assert!(raw.donators.is_empty());
        assert!(raw.donation_amounts.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = GatewayError::RemoteRejected {
            status: 400,
            reason: "execution reverted".to_string(),
        };
        assert_eq!(err.to_string(), "ledger rejected the call (400): execution reverted");
    }
}
