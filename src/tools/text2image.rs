//! text2image LLM tool
//!
//! Lets the model draw a picture for the user: generates the image and posts it into the
//! conversation, then tells the model what happened.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use super::handler::{LlmTool, ToolArgs};
use crate::core::{MessageChain, MessageEvent};
use crate::features::image_gen::{GenerationRequest, ImageRequestAdapter};

pub const TOOL_NAME: &str = "text2image";
/// Every image is rendered square at this size
pub const IMAGE_SIZE: &str = "1024*1024";

const GENERATION_FAILED: &str = "Image generation failed";
const PROCESSING_FAILED: &str = "An error occurred while processing the request";

/// Handler for the `text2image` tool
pub struct Text2ImageTool {
    adapter: Arc<ImageRequestAdapter>,
}

impl Text2ImageTool {
    pub fn new(adapter: Arc<ImageRequestAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl LlmTool for Text2ImageTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn description(&self) -> &'static str {
        "Draw an image from a text description and send it to the chat"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Prompt describing the image to generate"
                },
                "negative_prompt": {
                    "type": "string",
                    "description": "Negative prompt: what the image should not contain"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn call(&self, event: &dyn MessageEvent, args: &ToolArgs) -> String {
        let Some(prompt) = args.get_str("prompt") else {
            warn!(
                "text2image called without a prompt | Session: {}",
                event.session_id()
            );
            return GENERATION_FAILED.to_string();
        };
        let negative_prompt = args.get_str("negative_prompt").unwrap_or_default();

        let request = match GenerationRequest::new(prompt, negative_prompt, IMAGE_SIZE) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected text2image request: {e}");
                return GENERATION_FAILED.to_string();
            }
        };

        let image_url = match self.adapter.generate_image(&request).await {
            Ok(url) => url,
            // Already logged by the adapter
            Err(_) => return GENERATION_FAILED.to_string(),
        };

        let message = MessageChain::new().url_image(image_url);
        if let Err(e) = event.send(message).await {
            error!(
                "Failed to deliver generated image | Session: {} | Error: {e:?}",
                event.session_id()
            );
            return PROCESSING_FAILED.to_string();
        }

        info!("Image sent | Session: {}", event.session_id());
        format!(
            "Image generated successfully. Prompt: {prompt}, negative prompt: {negative_prompt}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, PluginConfig};
    use crate::features::image_gen::adapter::tests::{accepted, rejected, ScriptedService};
    use crate::features::image_gen::TaskStatus;
    use anyhow::Result;
    use std::sync::Mutex;

    /// Event that records every message sent through it
    struct RecordingEvent {
        sent: Mutex<Vec<MessageChain>>,
        fail_delivery: bool,
    }

    impl RecordingEvent {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_delivery: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_delivery: true,
                ..Self::new()
            }
        }

        fn sent(&self) -> Vec<MessageChain> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageEvent for RecordingEvent {
        fn session_id(&self) -> &str {
            "test-session"
        }

        async fn send(&self, message: MessageChain) -> Result<()> {
            if self.fail_delivery {
                return Err(anyhow::anyhow!("channel closed"));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn tool_with(service: Arc<ScriptedService>) -> Text2ImageTool {
        let adapter = ImageRequestAdapter::new(Arc::new(PluginConfig::new("sk-test")), service);
        Text2ImageTool::new(Arc::new(adapter))
    }

    fn fox_args() -> ToolArgs {
        ToolArgs::new().with("prompt", "a red fox")
    }

    #[test]
    fn test_tool_contract() {
        let tool = tool_with(Arc::new(ScriptedService::succeeding(&[])));
        assert_eq!(tool.name(), "text2image");

        let params = tool.parameters();
        assert_eq!(params["required"], json!(["prompt"]));
        assert_eq!(params["properties"]["prompt"]["type"], "string");
        assert_eq!(params["properties"]["negative_prompt"]["type"], "string");
    }

    #[tokio::test]
    async fn test_success_sends_one_image() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/a.png"]));
        let tool = tool_with(service.clone());
        let event = RecordingEvent::new();

        let reply = tool.call(&event, &fox_args()).await;

        assert!(reply.contains("a red fox"));
        let sent = event.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].components(),
            &[Component::Image {
                url: "https://x/a.png".to_string()
            }]
        );

        let submitted = service.submitted.lock().unwrap();
        assert_eq!(submitted[0].size, "1024*1024");
        assert_eq!(submitted[0].negative_prompt, None);
    }

    #[tokio::test]
    async fn test_reply_echoes_negative_prompt() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/b.png"]));
        let tool = tool_with(service.clone());
        let event = RecordingEvent::new();
        let args = fox_args().with("negative_prompt", "blurry");

        let reply = tool.call(&event, &args).await;

        assert!(reply.contains("blurry"));
        assert_eq!(
            service.submitted.lock().unwrap()[0].negative_prompt.as_deref(),
            Some("blurry")
        );
    }

    #[tokio::test]
    async fn test_rejected_submission_sends_nothing() {
        let service = Arc::new(ScriptedService::new(
            Ok(rejected(400, "quota exceeded")),
            Ok(accepted("unused")),
        ));
        let tool = tool_with(service);
        let event = RecordingEvent::new();

        let reply = tool.call(&event, &fox_args()).await;

        assert_eq!(reply, GENERATION_FAILED);
        assert!(event.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_results_sends_nothing() {
        let service = Arc::new(ScriptedService::new(
            Ok(accepted("task-1")),
            Ok(crate::features::image_gen::adapter::tests::finished(
                TaskStatus::Succeeded,
                &[],
            )),
        ));
        let tool = tool_with(service);
        let event = RecordingEvent::new();

        let reply = tool.call(&event, &fox_args()).await;

        assert_eq!(reply, GENERATION_FAILED);
        assert!(event.sent().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_as_text() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/a.png"]));
        let tool = tool_with(service);
        let event = RecordingEvent::failing();

        let reply = tool.call(&event, &fox_args()).await;

        assert_eq!(reply, PROCESSING_FAILED);
    }

    #[tokio::test]
    async fn test_missing_prompt_never_calls_service() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/a.png"]));
        let tool = tool_with(service.clone());
        let event = RecordingEvent::new();

        let reply = tool.call(&event, &ToolArgs::new()).await;

        assert_eq!(reply, GENERATION_FAILED);
        assert_eq!(service.submit_count(), 0);
        assert!(event.sent().is_empty());
    }

    #[tokio::test]
    async fn test_blank_prompt_never_calls_service() {
        let service = Arc::new(ScriptedService::succeeding(&["https://x/a.png"]));
        let tool = tool_with(service.clone());

        let reply = tool
            .call(&RecordingEvent::new(), &ToolArgs::new().with("prompt", "   "))
            .await;

        assert_eq!(reply, GENERATION_FAILED);
        assert_eq!(service.submit_count(), 0);
    }
}
