pub mod config;
pub mod error;
pub mod providers;
pub mod chains;
pub mod llm;
pub mod services;
pub mod api;

pub use config::Config;
pub use error::{ AppError, Result };
