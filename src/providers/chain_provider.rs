use async_trait::async_trait;
use ethers::types::U256;
use serde::Serialize;

use crate::chains::evm::WalletAddress;
use crate::error::{ AppError, Result };

/// Native token balance in both wei and ether.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub wei: U256,
    pub ether: f64,
}

impl Balance {
    /// Converts using exact 18-decimal formatting; the only loss is the final
    /// `f64` parse.
    pub fn from_wei(wei: U256) -> Result<Self> {
        let formatted = ethers::utils::format_ether(wei);
        let ether = formatted
            .parse::<f64>()
            .map_err(|e| AppError::Internal(format!("Failed to convert {} wei: {}", wei, e)))?;

        Ok(Self { wei, ether })
    }
}

#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Fresh connectivity probe against the RPC endpoint.
    async fn is_connected(&self) -> bool;

    /// Get native token balance in wei at the latest block.
    async fn get_balance(&self, address: &WalletAddress) -> Result<U256>;
}
