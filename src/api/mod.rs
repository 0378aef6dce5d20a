use std::sync::Arc;

use axum::{ routing::get, Router };
use serde::Deserialize;

pub mod root;
pub mod balance;
pub mod explain;

use crate::config::Config;
use crate::services::{ BalanceService, ExplanationService };

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub balance_service: Arc<BalanceService>,
    pub explanation_service: Arc<ExplanationService>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        balance_service: Arc<BalanceService>,
        explanation_service: Arc<ExplanationService>
    ) -> Self {
        Self {
            config,
            balance_service,
            explanation_service,
        }
    }
}

/// `?wallet=` query shared by both balance endpoints. A missing parameter is
/// treated as an empty address and rejected by the normalizer.
#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    #[serde(default)]
    pub wallet: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::home))
        .route("/debug_rpc", get(root::debug_rpc))
        .route("/eth_balance", get(balance::get_eth_balance))
        .route("/explain_balance", get(explain::explain_wallet_balance))
        .with_state(state)
}
