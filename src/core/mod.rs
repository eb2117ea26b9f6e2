pub mod config;
pub mod errors;

pub use config::{AppPaths, AssistantConfig};
pub use errors::AssistantError;
