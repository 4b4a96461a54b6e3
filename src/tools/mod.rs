//! # LLM Tools
//!
//! Tool trait, registry and the tools this plugin exposes to the host's model.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod handler;
pub mod registry;
pub mod text2image;

pub use handler::{LlmTool, ToolArgs, ToolDefinition};
pub use registry::ToolRegistry;
pub use text2image::Text2ImageTool;
