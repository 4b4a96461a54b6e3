//! # Core Module
//!
//! Configuration and the host-facing seams: message model, reply channel and plugin lifecycle.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add plugin lifecycle trait and metadata
//! - 1.0.0: Initial creation with config, message and event modules

pub mod config;
pub mod event;
pub mod message;
pub mod plugin;

// Re-export commonly used items
pub use config::{PluginConfig, DEFAULT_BASE_URL, DEFAULT_MODEL_NAME};
pub use event::MessageEvent;
pub use message::{Component, MessageChain};
pub use plugin::{Plugin, PluginMetadata};
