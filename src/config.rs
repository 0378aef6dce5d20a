use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::error::{ AppError, Result };

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 250;
pub const SECRETS_MANAGER_ID_VAR: &str = "SECRETS_MANAGER_ID";

/// One named set of key/value pairs that configuration can be read from.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub name: String,
    values: HashMap<String, String>,
}

impl ConfigLayer {
    pub fn new(name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Snapshot of the process environment.
    pub fn environment() -> Self {
        let values = env
            ::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::new("environment", values)
    }

    /// Managed secret store: a JSON object of `KEY -> value` held in AWS
    /// Secrets Manager. Entries that are not strings are skipped.
    pub async fn secrets_manager(secret_id: &str) -> Result<Self> {
        tracing::info!("Loading secrets from AWS Secrets Manager");

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_secretsmanager::Client::new(&aws_config);

        let response = client
            .get_secret_value()
            .secret_id(secret_id)
            .send().await
            .map_err(|e| AppError::Config(format!("Failed to fetch secret from Secrets Manager: {}", e)))?;

        let secret_string = response
            .secret_string()
            .ok_or_else(|| AppError::Config("Secret does not contain a string value".to_string()))?;

        Self::from_secret_json("secrets-manager", secret_string)
    }

    pub fn from_secret_json(name: impl Into<String>, secret: &str) -> Result<Self> {
        let entries: HashMap<String, serde_json::Value> = serde_json
            ::from_str(secret)
            .map_err(|e| AppError::Config(format!("Failed to parse secret JSON: {}", e)))?;

        let mut values = HashMap::new();
        for (key, value) in entries {
            match value {
                serde_json::Value::String(value) => {
                    values.insert(key, value.trim().to_string());
                }
                _ => tracing::warn!("Skipping non-string secret {}", key),
            }
        }

        tracing::info!("Loaded {} secrets", values.len());
        Ok(Self::new(name, values))
    }

    /// Local `.env` file. Parsed without touching the process environment.
    pub fn dotenv_file(path: &Path) -> Result<Self> {
        let iter = dotenv::from_path_iter(path).map_err(|e|
            AppError::Config(format!("Failed to open {}: {}", path.display(), e))
        )?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e|
                AppError::Config(format!("Failed to parse {}: {}", path.display(), e))
            )?;
            values.insert(key, value);
        }

        Ok(Self::new(format!("dotenv:{}", path.display()), values))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Ordered list of configuration layers; the first layer defining a key wins.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    layers: Vec<ConfigLayer>,
}

impl ConfigSources {
    pub fn new(layers: Vec<ConfigLayer>) -> Self {
        Self { layers }
    }

    /// Process environment, then the managed secret store, then `.env`.
    /// The secret store is used only when `SECRETS_MANAGER_ID` is set.
    pub async fn discover() -> Result<Self> {
        let mut layers = vec![ConfigLayer::environment()];

        match env::var(SECRETS_MANAGER_ID_VAR) {
            Ok(secret_id) if !secret_id.is_empty() => {
                layers.push(ConfigLayer::secrets_manager(&secret_id).await?);
            }
            _ => tracing::info!("{} not set, skipping managed secrets", SECRETS_MANAGER_ID_VAR),
        }

        let dotenv_path = Path::new(".env");
        if dotenv_path.is_file() {
            layers.push(ConfigLayer::dotenv_file(dotenv_path)?);
        }

        Ok(Self::new(layers))
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers
            .iter()
            .map(|layer| layer.name.as_str())
            .collect()
    }

    /// Empty values are treated as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|layer| layer.get(key).filter(|value| !value.is_empty()))
            .map(str::to_string)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alchemy_rpc: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub async fn from_env() -> Result<Self> {
        let sources = ConfigSources::discover().await?;
        tracing::info!("Configuration sources: {:?}", sources.layer_names());
        Self::from_sources(&sources)
    }

    pub fn from_sources(sources: &ConfigSources) -> Result<Self> {
        let alchemy_rpc = sources
            .get("ALCHEMY_RPC")
            .ok_or_else(|| AppError::Config("ALCHEMY_RPC is missing".to_string()))?;

        let openai_api_key = sources.get("OPENAI_API_KEY");

        let openai_base_url = sources
            .get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let llm_model = sources.get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

        let llm_max_tokens: u32 = match sources.get("LLM_MAX_TOKENS") {
            Some(raw) =>
                raw
                    .parse()
                    .map_err(|_| AppError::Config(format!("LLM_MAX_TOKENS must be an unsigned integer, got '{}'", raw)))?,
            None => DEFAULT_LLM_MAX_TOKENS,
        };

        let server_host = sources.get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port: u16 = match sources.get("SERVER_PORT") {
            Some(raw) =>
                raw
                    .parse()
                    .map_err(|_| AppError::Config(format!("SERVER_PORT must be a valid port, got '{}'", raw)))?,
            None => 8080,
        };

        Ok(Config {
            alchemy_rpc,
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_max_tokens,
            server_host,
            server_port,
        })
    }

    /// Shortened RPC URL for diagnostics; the tail usually carries the API key.
    pub fn rpc_url_preview(&self) -> String {
        let prefix: String = self.alchemy_rpc.chars().take(45).collect();
        format!("{}...", prefix)
    }

    pub fn openai_key_loaded(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
