//! HTTP Ledger Gateway
//!
//! reqwest-based [`LedgerGateway`] implementation against a contract relay
//! that exposes the crowdfunding contract over JSON: one read endpoint for
//! `getCampaigns` and one signed-send endpoint for the write methods.

use crate::ledger::gateway::{
    CreateRequest, GatewayError, LedgerGateway, RawCampaign, TransactionReceipt,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// HTTP client for the contract relay
pub struct HttpLedgerGateway {
    client: Client,
    config: LedgerConfig,
}

/// Configuration for the ledger gateway
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Base URL of the relay (e.g. "http://localhost:8545")
    pub endpoint: String,
    /// Address of the crowdfunding contract
    pub contract_address: String,
    /// Connected account address; absent when no wallet session exists
    pub account: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            contract_address: "0xcf13ec03df554cdf126e6e24b66a9ee46034dbf6".to_string(),
            account: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl HttpLedgerGateway {
    /// Create a new gateway with the given configuration
    pub fn new(config: LedgerConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| GatewayError::NetworkUnavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn call_url(&self) -> String {
        format!(
            "{}/contracts/{}/call",
            self.config.endpoint, self.config.contract_address
        )
    }

    fn send_url(&self) -> String {
        format!(
            "{}/contracts/{}/send",
            self.config.endpoint, self.config.contract_address
        )
    }

    async fn post<T, R>(&self, url: &str, body: &T) -> Result<R, GatewayError>
    where
        T: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::NetworkUnavailable(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| GatewayError::NetworkUnavailable(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let reason = response.text().await.unwrap_or_default();
            Err(GatewayError::RemoteRejected { status, reason })
        }
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    fn account(&self) -> Option<&str> {
        self.config.account.as_deref()
    }

    async fn read_all(&self) -> Result<Vec<RawCampaign>, GatewayError> {
        let body = CallRequest {
            method: "getCampaigns".to_string(),
            args: Vec::new(),
        };

        let response: CallResponse = self.post(&self.call_url(), &body).await?;
        tracing::debug!(count = response.result.len(), "read campaign records");
        Ok(response.result)
    }

    async fn submit_create(
        &self,
        request: &CreateRequest,
    ) -> Result<TransactionReceipt, GatewayError> {
        let from = self.account().ok_or(GatewayError::NoAccount)?.to_string();

        let body = SendRequest {
            from,
            method: "createCampaign".to_string(),
            args: vec![
                json!(request.owner),
                json!(request.title),
                json!(request.description),
                json!(request.target_base_units.to_string()),
                json!(request.deadline_epoch_seconds),
                json!(request.image),
            ],
            value: "0".to_string(),
        };

        let response: SendResponse = self.post(&self.send_url(), &body).await?;
        tracing::debug!(tx = %response.transaction_hash, "create transaction accepted");
        Ok(TransactionReceipt {
            transaction_hash: response.transaction_hash,
        })
    }

    async fn submit_donate(
        &self,
        campaign_index: u32,
        amount_base_units: u128,
    ) -> Result<TransactionReceipt, GatewayError> {
        let from = self.account().ok_or(GatewayError::NoAccount)?.to_string();

        let body = SendRequest {
            from,
            method: "donateToCampaign".to_string(),
            args: vec![json!(campaign_index)],
            value: amount_base_units.to_string(),
        };

        let response: SendResponse = self.post(&self.send_url(), &body).await?;
        tracing::debug!(tx = %response.transaction_hash, "donate transaction accepted");
        Ok(TransactionReceipt {
            transaction_hash: response.transaction_hash,
        })
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct CallRequest {
    method: String,
    args: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    #[serde(default)]
    result: Vec<RawCampaign>,
}

#[derive(Debug, Serialize)]
struct SendRequest {
    from: String,
    method: String,
    args: Vec<serde_json::Value>,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    transaction_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8545");
        assert!(config.account.is_none());
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_urls_include_contract_address() {
        let gateway = HttpLedgerGateway::new(LedgerConfig::default()).unwrap();
        let address = gateway.config().contract_address.clone();
        assert!(gateway.call_url().ends_with(&format!("{}/call", address)));
        assert!(gateway.send_url().ends_with(&format!("{}/send", address)));
    }

    #[tokio::test]
    async fn test_writes_require_an_account() {
        // No account configured: the write must fail before any network I/O.
        let gateway = HttpLedgerGateway::new(LedgerConfig::default()).unwrap();

        let request = CreateRequest {
            owner: "0xabc".to_string(),
            title: "Well".to_string(),
            description: "A village well".to_string(),
            target_base_units: 1,
            deadline_epoch_seconds: 1_769_947_200,
            image: String::new(),
        };
        assert!(matches!(
            gateway.submit_create(&request).await,
            Err(GatewayError::NoAccount)
        ));
        assert!(matches!(
            gateway.submit_donate(0, 1).await,
            Err(GatewayError::NoAccount)
        ));
    }

    #[test]
    fn test_send_request_serializes_value_as_string() {
        let body = SendRequest {
            from: "0xabc".to_string(),
            method: "donateToCampaign".to_string(),
            args: vec![json!(3)],
            value: "1000000000000000".to_string(),
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(encoded["value"], "1000000000000000");
        assert_eq!(encoded["args"][0], 3);
    }
}
