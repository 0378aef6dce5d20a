pub mod balance_service;
pub mod explanation_service;

pub use balance_service::{ BalanceService, ConnectedChain };
pub use explanation_service::ExplanationService;
