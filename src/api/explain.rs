use axum::{ extract::{ rejection::QueryRejection, Query, State }, Json };
use serde::{ Deserialize, Serialize };

use crate::chains::evm::normalize;
use crate::error::Result;

use super::{ AppState, WalletQuery };

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainBalanceResponse {
    pub wallet: String,
    pub balance_eth: f64,
    pub explanation: String,
}

/// Credential, connectivity, address, balance, then the LLM call. The first
/// failure aborts the request; no partial balance is returned.
pub async fn explain_wallet_balance(
    State(state): State<AppState>,
    query: std::result::Result<Query<WalletQuery>, QueryRejection>
) -> Result<Json<ExplainBalanceResponse>> {
    let Query(query) = query?;

    tracing::debug!(wallet = %query.wallet, "GET /explain_balance");

    state.explanation_service.ensure_configured()?;

    let chain = state.balance_service.connect().await?;
    let address = normalize(&query.wallet)?;
    let balance = chain.fetch_balance(&address).await?;

    let explanation = state.explanation_service.explain(&address, &balance).await?;

    Ok(
        Json(ExplainBalanceResponse {
            wallet: query.wallet,
            balance_eth: balance.ether,
            explanation,
        })
    )
}
