//! Image request adapter
//!
//! Turns a prompt into a remote synthesis task, waits for it and extracts the image URL.
//! Every failure is logged here and returned as a [`GenerationError`]; callers only decide
//! what to show the user.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Wait runs on a spawned task, FAILED/CANCELED tasks reported as completion errors
//! - 1.0.0: Initial release

use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use super::service::{ImageSynthesis, SynthesisRequest, TaskResponse};
use crate::core::PluginConfig;

/// Images requested per task; only the first result is ever surfaced
const IMAGES_PER_REQUEST: u32 = 1;

/// Why a generation produced no image
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The service rejected the task at submit time
    #[error("task submission failed ({status}): {message}")]
    Submission {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The service reported a non-success result for the finished task
    #[error("task failed ({status}): {message}")]
    Completion {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("task succeeded but returned no image")]
    EmptyResult,

    /// Network failure, malformed reply, or the wait task dying
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl GenerationError {
    fn submission(rsp: &TaskResponse) -> Self {
        GenerationError::Submission {
            status: rsp.status_code,
            code: rsp.error_code().map(str::to_string),
            message: rsp.error_message().to_string(),
        }
    }

    fn completion(rsp: &TaskResponse) -> Self {
        GenerationError::Completion {
            status: rsp.status_code,
            code: rsp.error_code().map(str::to_string),
            message: rsp.error_message().to_string(),
        }
    }

    /// Full diagnostic text: the cause chain, plus the backtrace when one was captured
    pub fn report(&self) -> String {
        match self {
            GenerationError::Transport(inner) => format!("{inner:?}"),
            other => other.to_string(),
        }
    }
}

/// One prompt to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    negative_prompt: Option<String>,
    size: String,
}

impl GenerationRequest {
    /// Build a request. An empty `negative_prompt` means "no negative prompt".
    pub fn new(
        prompt: impl Into<String>,
        negative_prompt: &str,
        size: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let negative_prompt = if negative_prompt.is_empty() {
            None
        } else {
            Some(negative_prompt.to_string())
        };

        Ok(Self {
            prompt,
            negative_prompt,
            size: size.into(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }

    pub fn size(&self) -> &str {
        &self.size
    }
}

/// Wraps the remote synthesis service behind a single call
#[derive(Clone)]
pub struct ImageRequestAdapter {
    config: Arc<PluginConfig>,
    service: Arc<dyn ImageSynthesis>,
}

impl ImageRequestAdapter {
    pub fn new(config: Arc<PluginConfig>, service: Arc<dyn ImageSynthesis>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Generate one image and return its URL.
    ///
    /// `Err` means there is nothing to show; it has already been logged.
    pub async fn generate_image(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let start_time = Instant::now();
        info!(
            "DashScope request | Model: {} | Size: {} | Prompt: '{}' | Negative: '{}'",
            self.config.model_name,
            request.size(),
            request.prompt().chars().take(100).collect::<String>(),
            request.negative_prompt().unwrap_or_default()
        );

        match self.run(request).await {
            Ok(url) => {
                info!(
                    "Image generated | Time: {:?} | URL: {}",
                    start_time.elapsed(),
                    url
                );
                Ok(url)
            }
            Err(e) => {
                error!(
                    "Image generation failed after {:?}: {}",
                    start_time.elapsed(),
                    e.report()
                );
                Err(e)
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let synthesis = SynthesisRequest {
            model: self.config.model_name.clone(),
            prompt: request.prompt().to_string(),
            negative_prompt: request.negative_prompt().map(str::to_string),
            n: IMAGES_PER_REQUEST,
            size: request.size().to_string(),
        };

        let submitted = self.service.submit(&self.config.api_key, &synthesis).await?;
        info!("DashScope submit status: {}", submitted.status_code);
        if !submitted.is_success() {
            return Err(GenerationError::submission(&submitted));
        }

        // The wait can run for as long as the service takes; keep it off the caller's task
        let service = Arc::clone(&self.service);
        let api_key = self.config.api_key.clone();
        let waiter = tokio::spawn(async move { service.wait(&submitted, &api_key).await });
        let completed = waiter
            .await
            .map_err(|e| anyhow::anyhow!("Task wait did not complete: {}", e))??;

        info!("DashScope result status: {}", completed.status_code);
        if !completed.is_success() {
            return Err(GenerationError::completion(&completed));
        }
        if completed.task_status().is_some_and(|s| s.is_failure()) {
            return Err(GenerationError::completion(&completed));
        }

        completed
            .results()
            .first()
            .and_then(|r| r.url.clone())
            .ok_or(GenerationError::EmptyResult)
    }
}
