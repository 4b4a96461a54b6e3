//! # Ali T2I Plugin
//!
//! Draws pictures with Alibaba Cloud's Tongyi Wanxiang text-to-image models.
//!
//! - **Version**: 0.1.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::core::{Plugin, PluginConfig, PluginMetadata};
use crate::features::image_gen::{DashScopeClient, ImageRequestAdapter, ImageSynthesis};
use crate::tools::{Text2ImageTool, ToolRegistry};

pub const METADATA: PluginMetadata = PluginMetadata {
    name: "ali_t2i_ye",
    author: "gameswu",
    description: "Text-to-image drawing with Alibaba Cloud Tongyi Wanxiang",
    version: "0.1.0",
    repository: "https://github.com/gameswu/ali_t2i_ye",
};

pub struct AliT2iPlugin {
    config: Arc<PluginConfig>,
    adapter: Arc<ImageRequestAdapter>,
}

impl AliT2iPlugin {
    /// Create the plugin backed by the DashScope HTTP API at `config.base_url`
    pub fn new(config: PluginConfig) -> Result<Self> {
        let client = DashScopeClient::new(&config.base_url)?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// Create the plugin with any synthesis backend
    pub fn with_service(config: PluginConfig, service: Arc<dyn ImageSynthesis>) -> Self {
        let config = Arc::new(config);
        let adapter = Arc::new(ImageRequestAdapter::new(Arc::clone(&config), service));
        Self { config, adapter }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn adapter(&self) -> Arc<ImageRequestAdapter> {
        Arc::clone(&self.adapter)
    }
}

#[async_trait]
impl Plugin for AliT2iPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &METADATA
    }

    async fn initialize(&self) -> Result<()> {
        if !self.config.has_api_key() {
            warn!("No DashScope API key configured; every text2image call will fail");
        }
        info!(
            "{} v{} ready | Model: {}",
            METADATA.name, METADATA.version, self.config.model_name
        );
        Ok(())
    }

    fn register_tools(&self, registry: &mut ToolRegistry) {
        registry.register(Arc::new(Text2ImageTool::new(self.adapter())));
    }

    async fn terminate(&self) -> Result<()> {
        info!("{} unloaded", METADATA.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MessageChain, MessageEvent};
    use crate::features::image_gen::adapter::tests::ScriptedService;
    use crate::tools::ToolArgs;

    struct NullEvent;

    #[async_trait]
    impl MessageEvent for NullEvent {
        fn session_id(&self) -> &str {
            "null"
        }

        async fn send(&self, _message: MessageChain) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_metadata() {
        let plugin = AliT2iPlugin::new(PluginConfig::new("sk-test")).unwrap();
        assert_eq!(plugin.metadata().name, "ali_t2i_ye");
        assert_eq!(plugin.metadata().version, "0.1.0");
    }

    #[test]
    fn test_registers_text2image() {
        let plugin = AliT2iPlugin::new(PluginConfig::new("sk-test")).unwrap();
        let mut registry = ToolRegistry::new();
        plugin.register_tools(&mut registry);

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("text2image"));
    }

    #[tokio::test]
    async fn test_lifecycle_without_api_key() {
        let plugin = AliT2iPlugin::new(PluginConfig::new("")).unwrap();
        assert!(plugin.initialize().await.is_ok());
        assert!(plugin.terminate().await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_through_registry() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/a.png"]));
        let plugin = AliT2iPlugin::with_service(
            PluginConfig::new("sk-test").with_model_name("wanx2.1-t2i-plus"),
            service.clone(),
        );
        let mut registry = ToolRegistry::new();
        plugin.register_tools(&mut registry);

        let args = ToolArgs::from_json_str(r#"{"prompt": "a red fox"}"#).unwrap();
        let reply = registry
            .dispatch("text2image", &NullEvent, &args)
            .await
            .unwrap();

        assert!(reply.contains("a red fox"));
        assert_eq!(service.submitted.lock().unwrap()[0].model, "wanx2.1-t2i-plus");
    }
}
