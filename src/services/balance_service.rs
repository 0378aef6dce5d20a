use std::sync::Arc;

use crate::chains::evm::WalletAddress;
use crate::error::{ AppError, Result };
use crate::providers::{ Balance, ChainProvider };

pub struct BalanceService {
    provider: Arc<dyn ChainProvider>,
}

/// Proof that the connectivity probe passed for the current request.
pub struct ConnectedChain<'a> {
    provider: &'a dyn ChainProvider,
}

impl BalanceService {
    pub fn new(provider: Arc<dyn ChainProvider>) -> Self {
        Self { provider }
    }

    pub async fn is_connected(&self) -> bool {
        self.provider.is_connected().await
    }

    pub async fn connect(&self) -> Result<ConnectedChain<'_>> {
        if !self.provider.is_connected().await {
            return Err(AppError::ProviderUnavailable);
        }

        Ok(ConnectedChain {
            provider: self.provider.as_ref(),
        })
    }
}

impl ConnectedChain<'_> {
    pub async fn fetch_balance(&self, address: &WalletAddress) -> Result<Balance> {
        let wei = self.provider.get_balance(address).await?;
        let balance = Balance::from_wei(wei)?;

        tracing::debug!(%address, ether = balance.ether, "Fetched balance");

        Ok(balance)
    }
}
