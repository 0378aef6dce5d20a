pub mod address;
pub mod provider;

pub use address::{ normalize, WalletAddress };
pub use provider::EvmProvider;
