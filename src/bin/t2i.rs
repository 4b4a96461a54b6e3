use anyhow::Result;
use async_trait::async_trait;
use dotenvy::dotenv;
use log::{error, info};

use ali_t2i::core::{Component, MessageChain, MessageEvent, Plugin, PluginConfig};
use ali_t2i::tools::{ToolArgs, ToolRegistry};
use ali_t2i::AliT2iPlugin;

const USAGE: &str = "usage: t2i <prompt> [negative_prompt]";

/// Reply channel that prints messages to stdout
struct ConsoleEvent {
    session_id: String,
}

#[async_trait]
impl MessageEvent for ConsoleEvent {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn send(&self, message: MessageChain) -> Result<()> {
        for component in message.components() {
            match component {
                Component::Image { url } => println!("[image] {url}"),
                Component::Plain { text } => println!("{text}"),
            }
        }
        Ok(())
    }
}

fn load_config() -> Result<PluginConfig> {
    match std::env::var("T2I_CONFIG_PATH") {
        Ok(path) => {
            info!("📄 Loading plugin config from {path}");
            PluginConfig::load(&path)
        }
        Err(_) => PluginConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log_level))
        .init();

    let mut argv = std::env::args().skip(1);
    let prompt = argv.next().ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let negative_prompt = argv.next().unwrap_or_default();

    let config = load_config().map_err(|e| {
        error!("Failed to load configuration: {e}");
        e
    })?;
    info!("Configuration loaded | {config:?}");

    let plugin = AliT2iPlugin::new(config)?;
    plugin.initialize().await?;

    let mut registry = ToolRegistry::new();
    plugin.register_tools(&mut registry);

    let event = ConsoleEvent {
        session_id: format!("console-{}", std::process::id()),
    };
    let args = ToolArgs::new()
        .with("prompt", prompt)
        .with("negative_prompt", negative_prompt);

    let reply = registry.dispatch("text2image", &event, &args).await?;
    println!("{reply}");

    plugin.terminate().await?;
    Ok(())
}
