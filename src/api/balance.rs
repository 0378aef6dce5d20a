use axum::{ extract::{ rejection::QueryRejection, Query, State }, Json };
use serde::{ Deserialize, Serialize };

use crate::chains::evm::normalize;
use crate::error::Result;

use super::{ AppState, WalletQuery };

#[derive(Debug, Serialize, Deserialize)]
pub struct EthBalanceResponse {
    pub wallet: String,
    pub eth_balance: f64,
}

pub async fn get_eth_balance(
    State(state): State<AppState>,
    query: std::result::Result<Query<WalletQuery>, QueryRejection>
) -> Result<Json<EthBalanceResponse>> {
    let Query(query) = query?;

    tracing::debug!(wallet = %query.wallet, "GET /eth_balance");

    let chain = state.balance_service.connect().await?;
    let address = normalize(&query.wallet)?;
    let balance = chain.fetch_balance(&address).await?;

    Ok(
        Json(EthBalanceResponse {
            wallet: query.wallet,
            eth_balance: balance.ether,
        })
    )
}
