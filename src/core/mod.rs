pub mod classifier;
pub mod dataset;
pub mod doctor;
pub mod engine;
pub mod model_store;
pub mod prompts;
pub mod scoring;

pub use crate::domain::ports::{ChatProvider, Storage};
pub use crate::utils::error::Result;
