//! Infrastructure layer for ai-roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider adapters, the JSONL transcript
//! logger, and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigEditError, ConfigLoader, ConfigStore, FileConfig, FileModelConfig, FileOutputConfig,
    FileReplConfig, FileRoundtableConfig, ModelUpdate, load_env_files, resolve_api_key,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    AnthropicAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderKind, RoutingInvoker,
};
