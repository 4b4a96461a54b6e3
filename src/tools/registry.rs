//! Tool registry
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add dispatch and tool definitions for the model
//! - 1.0.0: Initial implementation for tool lookup

use anyhow::Result;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::handler::{LlmTool, ToolArgs, ToolDefinition};
use crate::core::MessageEvent;

/// Registry mapping tool names to tools
///
/// # Example
///
/// ```ignore
/// let mut registry = ToolRegistry::new();
/// registry.register(Arc::new(Text2ImageTool::new(adapter)));
///
/// let reply = registry.dispatch("text2image", &event, &args).await?;
/// ```
#[derive(Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn LlmTool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool under its declared name
    ///
    /// A later tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn LlmTool>) {
        debug!("Registering LLM tool | Name: {}", tool.name());
        self.tools.insert(tool.name(), tool);
    }

    /// Get tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn LlmTool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> impl Iterator<Item = &&'static str> {
        self.tools.keys()
    }

    /// Definitions of every registered tool, for advertising to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name(),
                description: tool.description(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Call the named tool
    ///
    /// Only an unknown tool name is an error; the tool's own failures come back as text.
    pub async fn dispatch(
        &self,
        name: &str,
        event: &dyn MessageEvent,
        args: &ToolArgs,
    ) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        debug!(
            "Dispatching LLM tool | Name: {} | Session: {}",
            name,
            event.session_id()
        );
        Ok(tool.call(event, args).await)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
