// Core layer - configuration and host-facing seams
pub mod core;

// Features layer - remote image generation
pub mod features;

// Tools layer - LLM tool trait, registry and handlers
pub mod tools;

// The plugin itself
pub mod plugin;

pub use crate::core::{Component, MessageChain, MessageEvent, Plugin, PluginConfig, PluginMetadata};

pub use features::{
    DashScopeClient, GenerationError, GenerationRequest, ImageRequestAdapter, ImageSynthesis,
};

pub use plugin::AliT2iPlugin;

pub use tools::{LlmTool, Text2ImageTool, ToolArgs, ToolRegistry};
