pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{openrouter::OpenRouterClient, storage::LocalStorage};
pub use config::CopilotConfig;
pub use core::{engine::Copilot, model_store::ModelStore};
pub use utils::error::{CopilotError, Result};
