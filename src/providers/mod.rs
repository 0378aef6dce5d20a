pub mod chain_provider;
pub mod llm_provider;

pub use chain_provider::{ Balance, ChainProvider };
pub use llm_provider::{ ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChoiceMessage, LlmProvider };
