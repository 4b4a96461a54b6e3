//! # Plugin Configuration
//!
//! Read-only settings handed to the plugin at construction: the DashScope API key,
//! the text-to-image model and the service endpoint.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: YAML file and environment sources for the console host
//! - 1.0.0: Initial release with host-supplied JSON config

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Model used when the host config does not name one
pub const DEFAULT_MODEL_NAME: &str = "wanx2.1-t2i-turbo";
/// Public DashScope endpoint
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

#[derive(Clone, Deserialize, Serialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl PluginConfig {
    /// Create a configuration with the given key and default model/endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: default_model_name(),
            base_url: default_base_url(),
        }
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build from the host's per-plugin config object.
    ///
    /// Missing keys fall back to defaults; unknown keys are ignored.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: PluginConfig = serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("Invalid plugin config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path, e))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: PluginConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// `DASHSCOPE_API_KEY` is required; `T2I_MODEL_NAME` and `DASHSCOPE_BASE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DASHSCOPE_API_KEY")
            .map_err(|_| anyhow::anyhow!("DASHSCOPE_API_KEY environment variable not set"))?;
        let model_name =
            std::env::var("T2I_MODEL_NAME").unwrap_or_else(|_| default_model_name());
        let base_url = std::env::var("DASHSCOPE_BASE_URL").unwrap_or_else(|_| default_base_url());

        let config = Self {
            api_key,
            model_name,
            base_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Whether a key is present; the service rejects every request without one
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(anyhow::anyhow!("model_name must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginConfig")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_applies_defaults() {
        let config = PluginConfig::from_value(json!({ "api_key": "sk-test" })).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.has_api_key());
    }

    #[test]
    fn test_from_value_empty_object() {
        let config = PluginConfig::from_value(json!({})).unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.model_name, "wanx2.1-t2i-turbo");
    }

    #[test]
    fn test_from_value_ignores_unknown_keys() {
        let config = PluginConfig::from_value(json!({
            "api_key": "sk-test",
            "model_name": "wanx2.1-t2i-plus",
            "enable": true
        }))
        .unwrap();
        assert_eq!(config.model_name, "wanx2.1-t2i-plus");
    }

    #[test]
    fn test_from_value_rejects_wrong_types() {
        assert!(PluginConfig::from_value(json!({ "api_key": 42 })).is_err());
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = "api_key: sk-yaml\nmodel_name: wanx-v1\nbase_url: http://localhost:8080\n";
        let config = PluginConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_key, "sk-yaml");
        assert_eq!(config.model_name, "wanx-v1");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = PluginConfig::from_yaml_str("api_key: k\nbase_url: ftp://example.com\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = PluginConfig::load("/nonexistent/t2i.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = PluginConfig::new("sk-very-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("has_api_key: true"));
    }

    #[test]
    fn test_whitespace_key_is_not_a_key() {
        assert!(!PluginConfig::new("   ").has_api_key());
    }
}
