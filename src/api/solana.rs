use crate::api::types::{RawHolders, RpcTokenAccount, RpcTokenAmount};
use crate::config::SolanaConfig;
use crate::error::{Error, Result};
use crate::metrics::{API_CALLS, API_ERRORS, API_LATENCY};
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const METRICS_LABEL: &str = "solana";

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcValue<T> {
    value: T,
}

/// Minimal JSON-RPC client for the token queries the holders endpoint needs.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    client: Client,
    rpc_url: String,
}

impl SolanaRpcClient {
    pub fn new(config: &SolanaConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            rpc_url: config.rpc_url.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        debug!("RPC {} {}", method, params);
        API_CALLS.with_label_values(&[METRICS_LABEL]).inc();
        let timer = API_LATENCY.with_label_values(&[METRICS_LABEL]).start_timer();
        let result = self.send(method, params).await;
        timer.observe_duration();

        if let Err(e) = &result {
            API_ERRORS.with_label_values(&[METRICS_LABEL]).inc();
            error!("RPC {} failed: {}", method, e);
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self.client.post(&self.rpc_url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(format!(
                "Solana RPC {} failed with status: {}",
                method,
                response.status()
            )));
        }

        let rpc: RpcResponse<T> = response.json().await?;
        match (rpc.result, rpc.error) {
            (_, Some(err)) => Err(Error::ApiError(format!(
                "Solana RPC {} error {}: {}",
                method, err.code, err.message
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::ApiInvalidFormat(format!(
                "Solana RPC {} returned neither result nor error",
                method
            ))),
        }
    }

    pub async fn get_token_largest_accounts(&self, mint: &str) -> Result<Vec<RpcTokenAccount>> {
        let response: RpcValue<Vec<RpcTokenAccount>> = self
            .call("getTokenLargestAccounts", json!([mint, {"commitment": "confirmed"}]))
            .await?;
        Ok(response.value)
    }

    pub async fn get_token_supply(&self, mint: &str) -> Result<RpcTokenAmount> {
        let response: RpcValue<RpcTokenAmount> = self
            .call("getTokenSupply", json!([mint, {"commitment": "confirmed"}]))
            .await?;
        Ok(response.value)
    }

    pub async fn get_holders(&self, mint: &str) -> Result<RawHolders> {
        let (accounts, supply) = tokio::try_join!(
            self.get_token_largest_accounts(mint),
            self.get_token_supply(mint)
        )?;
        Ok(RawHolders { accounts, supply })
    }
}
