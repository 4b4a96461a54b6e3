//! LLM tool trait and argument handling
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::MessageEvent;

/// Trait for tools the host's LLM can call
///
/// Each tool declares its name, a description and a JSON-schema parameter object so the
/// host can advertise it to the model. Tools are registered with a [`ToolRegistry`] and
/// dispatched by name.
///
/// `call` returns the text handed back to the model. It cannot fail: tools report their
/// own failures as text.
///
/// # Example
///
/// ```ignore
/// pub struct EchoTool;
///
/// #[async_trait]
/// impl LlmTool for EchoTool {
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn description(&self) -> &'static str {
///         "Repeat the given text"
///     }
///
///     fn parameters(&self) -> Value {
///         json!({ "type": "object", "properties": { "text": { "type": "string" } } })
///     }
///
///     async fn call(&self, _event: &dyn MessageEvent, args: &ToolArgs) -> String {
///         args.get_str("text").unwrap_or_default().to_string()
///     }
/// }
/// ```
///
/// [`ToolRegistry`]: super::ToolRegistry
#[async_trait]
pub trait LlmTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema (`type: object`) describing the accepted arguments
    fn parameters(&self) -> Value;

    /// Run the tool for the given event
    ///
    /// # Arguments
    ///
    /// * `event` - Event the call originated from; replies go through it
    /// * `args` - Arguments produced by the model
    async fn call(&self, event: &dyn MessageEvent, args: &ToolArgs) -> String;
}

/// Tool description advertised to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Arguments of one tool call, as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw argument string from a model's tool call.
    ///
    /// An empty string is treated as no arguments.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Tool arguments are not valid JSON: {}", e))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(anyhow::anyhow!(
                "Tool arguments must be a JSON object, got: {}",
                other
            )),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// String argument by name; `None` if absent or not a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}
