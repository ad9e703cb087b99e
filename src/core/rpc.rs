//! JSON-RPC client for an Ethereum node.
//!
//! Only read-only calls are needed, so the client exposes `eth_call` plus a
//! generic `request` for anything else.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::trace;
use url::Url;

use crate::error::{Result, RpcError};

/// HTTP JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcProvider {
    client: reqwest::Client,
    url: Url,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<NodeError>,
}

#[derive(Deserialize)]
struct NodeError {
    code: i64,
    message: String,
}

impl RpcProvider {
    /// Create a provider for the given endpoint.
    ///
    /// No request is made until the first call.
    ///
    /// # Errors
    ///
    /// Returns `RpcError::InvalidUrl` if the endpoint does not parse.
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|source| RpcError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("fnsecrets/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RpcError::Transport)?;

        Ok(Self { client, url })
    }

    /// Endpoint this provider talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send a JSON-RPC request and decode its result.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        trace!(method, "rpc request");

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(RpcError::Transport)?;

        if !response.status().is_success() {
            return Err(RpcError::Status(response.status()).into());
        }

        let response: Response<T> = response.json().await.map_err(RpcError::Transport)?;

        if let Some(error) = response.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            }
            .into());
        }

        response
            .result
            .ok_or_else(|| RpcError::Malformed(format!("{} returned no result", method)).into())
    }

    /// Execute a read-only contract call against the latest block.
    pub async fn call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);

        let result: String = self.request("eth_call", params).await?;
        let raw = result.strip_prefix("0x").unwrap_or(&result);

        let bytes = hex::decode(raw)
            .map_err(|e| RpcError::Malformed(format!("eth_call result is not hex: {}", e)))?;

        trace!(to, len = bytes.len(), "eth_call returned");
        Ok(bytes)
    }
}
