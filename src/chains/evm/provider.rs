use async_trait::async_trait;
use ethers::{ providers::{ Http, Middleware, Provider }, types::U256 };
use std::sync::Arc;

use crate::chains::evm::WalletAddress;
use crate::error::{ AppError, Result };
use crate::providers::ChainProvider;

#[derive(Clone)]
pub struct EvmProvider {
    provider: Arc<Provider<Http>>,
    // Normalized the same way the transport prints it in error messages.
    rpc_url: String,
}

impl EvmProvider {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>
            ::try_from(rpc_url)
            .map_err(|e| AppError::Config(format!("Failed to create provider: {}", e)))?;

        let rpc_url = reqwest::Url
            ::parse(rpc_url)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| rpc_url.to_string());

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url,
        })
    }

    /// Hosted RPC URLs embed the API key, and transport errors echo the URL.
    fn redact(&self, message: String) -> String {
        message.replace(&self.rpc_url, "<rpc url>")
    }
}

#[async_trait]
impl ChainProvider for EvmProvider {
    async fn is_connected(&self) -> bool {
        match self.provider.client_version().await {
            Ok(version) => {
                tracing::debug!("RPC reachable: {}", version);
                true
            }
            Err(e) => {
                tracing::warn!("RPC connectivity probe failed: {}", self.redact(e.to_string()));
                false
            }
        }
    }

    async fn get_balance(&self, address: &WalletAddress) -> Result<U256> {
        self.provider
            .get_balance(address.as_address(), None).await
            .map_err(|e| {
                AppError::ProviderCallFailed(
                    self.redact(format!("Failed to get balance: {}", e))
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::evm::normalize;
    use axum::{ routing::post, Json, Router };
    use serde_json::{ json, Value };

    /// Minimal JSON-RPC node answering the two methods the provider uses.
    async fn rpc_handler(Json(request): Json<Value>) -> Json<Value> {
        let id = request["id"].clone();
        let response = match request["method"].as_str() {
            Some("web3_clientVersion") =>
                json!({ "jsonrpc": "2.0", "id": id, "result": "MockNode/v1.0.0" }),
            Some("eth_getBalance") => {
                let address = request["params"][0].as_str().unwrap_or_default().to_lowercase();
                if address == "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed" {
                    json!({ "jsonrpc": "2.0", "id": id, "result": "0xde0b6b3a7640000" })
                } else {
                    json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": { "code": 429, "message": "rate limited" }
                    })
                }
            }
            _ =>
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32601, "message": "method not found" }
                }),
        };
        Json(response)
    }

    async fn spawn_mock_node() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/", post(rpc_handler));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_connected_and_balance() {
        let url = spawn_mock_node().await;
        let provider = EvmProvider::new(&url).unwrap();

        assert!(provider.is_connected().await);

        let address = normalize("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let wei = provider.get_balance(&address).await.unwrap();
        assert_eq!(wei, U256::exp10(18));
    }

    #[tokio::test]
    async fn test_rpc_error_is_provider_call_failure() {
        let url = spawn_mock_node().await;
        let provider = EvmProvider::new(&url).unwrap();

        let address = normalize("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359").unwrap();
        let err = provider.get_balance(&address).await.unwrap_err();
        assert!(matches!(err, AppError::ProviderCallFailed(ref msg) if msg.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_disconnected() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = EvmProvider::new(&format!("http://{}", addr)).unwrap();
        assert!(!provider.is_connected().await);
    }

    #[tokio::test]
    async fn test_transport_errors_hide_rpc_url() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = EvmProvider::new(&format!("http://{}/v2/secret-api-key", addr)).unwrap();
        let address = normalize("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();

        let err = provider.get_balance(&address).await.unwrap_err();
        assert!(matches!(err, AppError::ProviderCallFailed(_)));
        assert!(!err.to_string().contains("secret-api-key"), "{}", err);
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(EvmProvider::new("not a url"), Err(AppError::Config(_))));
    }
}
