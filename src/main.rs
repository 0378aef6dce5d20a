use chabi_wallet::{ Config, Result };
use chabi_wallet::chains::evm::EvmProvider;
use chabi_wallet::llm::OpenAiClient;
use chabi_wallet::providers::{ ChainProvider, LlmProvider };
use chabi_wallet::services::{ BalanceService, ExplanationService };
use std::sync::Arc;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "chabi_wallet=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env().await?);

    // Initialize RPC provider
    let chain_provider: Arc<dyn ChainProvider> = Arc::new(EvmProvider::new(&config.alchemy_rpc)?);
    tracing::info!("RPC provider initialized");

    // Initialize LLM client; without a key the explain endpoint answers 500
    let llm: Option<Arc<dyn LlmProvider>> = match &config.openai_api_key {
        Some(api_key) => {
            tracing::info!("LLM client initialized for {}", config.openai_base_url);
            let client = OpenAiClient::new(api_key.clone(), config.openai_base_url.clone());
            Some(Arc::new(client) as Arc<dyn LlmProvider>)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, /explain_balance will be unavailable");
            None
        }
    };

    // Initialize services
    let balance_service = Arc::new(BalanceService::new(chain_provider));
    let explanation_service = Arc::new(
        ExplanationService::new(llm, config.llm_model.clone(), config.llm_max_tokens)
    );

    // Create app state
    let app_state = chabi_wallet::api::AppState::new(
        config.clone(),
        balance_service,
        explanation_service
    );

    // Build application router
    let app = chabi_wallet::api
        ::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.listen_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| chabi_wallet::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| chabi_wallet::AppError::Internal(e.to_string()))?;

    Ok(())
}
