//! Plugin lifecycle trait and metadata
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::tools::ToolRegistry;

/// Registration details the host shows in its plugin list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub repository: &'static str,
}

/// A plugin loaded by the host
///
/// The host calls `initialize` once after construction, `register_tools` to collect the
/// plugin's LLM tools, and `terminate` when the plugin is disabled or unloaded.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Add this plugin's tools to the host registry
    fn register_tools(&self, registry: &mut ToolRegistry);

    async fn terminate(&self) -> Result<()> {
        Ok(())
    }
}
