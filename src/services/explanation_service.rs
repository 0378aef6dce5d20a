use std::sync::Arc;

use crate::chains::evm::WalletAddress;
use crate::error::{ AppError, Result };
use crate::providers::{ Balance, ChatMessage, ChatRequest, LlmProvider };

const SYSTEM_PROMPT: &str = "You are a helpful assistant for a Web3 wallet app.";

pub struct ExplanationService {
    llm: Option<Arc<dyn LlmProvider>>,
    model: String,
    max_tokens: u32,
}

impl ExplanationService {
    /// `llm` is `None` when no API key is configured.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, model: String, max_tokens: u32) -> Self {
        Self {
            llm,
            model,
            max_tokens,
        }
    }

    pub fn ensure_configured(&self) -> Result<&dyn LlmProvider> {
        self.llm.as_deref().ok_or(AppError::LlmMisconfigured)
    }

    pub fn build_prompt(balance: &Balance) -> String {
        format!(
            "This Ethereum wallet has a balance of {:.2} ETH. \
             Explain what this means in simple words. \
             Also suggest why a wallet might hold that much ETH (whale, DAO, exchange, etc.).",
            balance.ether
        )
    }

    pub fn build_request(&self, balance: &Balance) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(Self::build_prompt(balance))
            ],
            max_tokens: self.max_tokens,
        }
    }

    pub async fn explain(&self, wallet: &WalletAddress, balance: &Balance) -> Result<String> {
        let llm = self.ensure_configured()?;

        tracing::debug!(%wallet, model = %self.model, "Requesting balance explanation");

        let response = llm.chat_completion(self.build_request(balance)).await?;

        if response.choices.is_empty() {
            return Err(AppError::LlmCallFailed("LLM returned no choices".to_string()));
        }

        response
            .first_content()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AppError::LlmCallFailed("LLM response has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::evm::normalize;
    use crate::providers::{ ChatChoice, ChatResponse, ChoiceMessage };
    use async_trait::async_trait;
    use ethers::types::U256;
    use std::sync::Mutex;

    struct ScriptedLlm {
        response: ChatResponse,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn scripted(contents: &[Option<&str>]) -> Arc<ScriptedLlm> {
        Arc::new(ScriptedLlm {
            response: ChatResponse {
                choices: contents
                    .iter()
                    .map(|content| ChatChoice {
                        message: ChoiceMessage {
                            content: content.map(str::to_string),
                        },
                    })
                    .collect(),
            },
            seen: Mutex::new(Vec::new()),
        })
    }

    fn balance(wei: u128) -> Balance {
        Balance::from_wei(U256::from(wei)).unwrap()
    }

    fn wallet() -> WalletAddress {
        normalize("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap()
    }

    #[test]
    fn test_prompt_two_decimals() {
        let prompt = ExplanationService::build_prompt(&balance(1_234_567_000_000_000_000));
        assert!(prompt.starts_with("This Ethereum wallet has a balance of 1.23 ETH. "));
        assert!(prompt.ends_with("(whale, DAO, exchange, etc.)."));
    }

    #[test]
    fn test_request_shape() {
        let service = ExplanationService::new(None, "test-model".to_string(), 250);
        let request = service.build_request(&balance(0));

        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, 250);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("0.00 ETH"));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let service = ExplanationService::new(None, "m".to_string(), 250);
        let err = service.explain(&wallet(), &balance(0)).await.unwrap_err();
        assert!(matches!(err, AppError::LlmMisconfigured));
    }

    #[tokio::test]
    async fn test_first_choice_trimmed() {
        let llm = scripted(&[Some("\n  A whale wallet.  \n"), Some("ignored")]);
        let service = ExplanationService::new(Some(llm.clone() as Arc<dyn LlmProvider>), "m".to_string(), 250);

        let text = service.explain(&wallet(), &balance(10u128.pow(18))).await.unwrap();

        assert_eq!(text, "A whale wallet.");
        assert_eq!(llm.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_choices_fail() {
        let service = ExplanationService::new(Some(scripted(&[]) as Arc<dyn LlmProvider>), "m".to_string(), 250);
        let err = service.explain(&wallet(), &balance(0)).await.unwrap_err();
        assert!(matches!(err, AppError::LlmCallFailed(_)));
    }

    #[tokio::test]
    async fn test_null_content_fails() {
        let service = ExplanationService::new(Some(scripted(&[None]) as Arc<dyn LlmProvider>), "m".to_string(), 250);
        let err = service.explain(&wallet(), &balance(0)).await.unwrap_err();
        assert!(matches!(err, AppError::LlmCallFailed(_)));
    }
}
