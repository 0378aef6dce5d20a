use axum::{ extract::State, Json };
use serde::{ Deserialize, Serialize };

use super::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DebugRpcResponse {
    pub alchemy_loaded: String,
    pub connected: bool,
    pub openai_base: String,
    pub openai_key_loaded: bool,
}

pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "🚀 Chabi Wallet ab sa live!".to_string(),
    })
}

pub async fn debug_rpc(State(state): State<AppState>) -> Json<DebugRpcResponse> {
    let connected = state.balance_service.is_connected().await;

    Json(DebugRpcResponse {
        alchemy_loaded: state.config.rpc_url_preview(),
        connected,
        openai_base: state.config.openai_base_url.clone(),
        openai_key_loaded: state.config.openai_key_loaded(),
    })
}
