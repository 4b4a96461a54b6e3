//! Image synthesis service trait and DashScope wire types
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP status the service uses for success
pub const STATUS_OK: u16 = 200;

/// Remote text-to-image service
///
/// Generation is asynchronous on the service side: `submit` creates a task and returns
/// immediately, `wait` blocks (asynchronously) until that task reaches a terminal state.
/// Both return the service's reply even when it reports a failure; `Err` is reserved for
/// transport problems and malformed replies.
#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    /// Create a generation task
    async fn submit(&self, api_key: &str, request: &SynthesisRequest) -> Result<TaskResponse>;

    /// Wait until the submitted task finishes
    async fn wait(&self, task: &TaskResponse, api_key: &str) -> Result<TaskResponse>;
}

/// Parameters of one generation task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub model: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// Number of images to generate
    pub n: u32,
    /// `width*height`, e.g. `1024*1024`
    pub size: String,
}

/// Lifecycle state of a remote task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Suspended,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Whether the task will not change state any more
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled | TaskStatus::Unknown
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TaskStatus::Failed | TaskStatus::Canceled | TaskStatus::Unknown
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Suspended => "SUSPENDED",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Canceled => "CANCELED",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

/// One generated image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_prompt: Option<String>,
    /// Prompt after the service's own rewriting, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TaskMetrics {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub succeeded: u32,
    #[serde(default)]
    pub failed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<TaskStatus>,
    #[serde(default)]
    pub results: Vec<ImageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_metrics: Option<TaskMetrics>,
    /// Failure details of a FAILED task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUsage {
    #[serde(default)]
    pub image_count: u32,
}

/// Reply to a submit or task query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// HTTP status of the reply; not part of the body
    #[serde(skip)]
    pub status_code: u16,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TaskOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TaskUsage>,
}

impl TaskResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    pub fn task_id(&self) -> Option<&str> {
        self.output
            .as_ref()
            .map(|o| o.task_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn task_status(&self) -> Option<TaskStatus> {
        self.output.as_ref().and_then(|o| o.task_status)
    }

    pub fn results(&self) -> &[ImageResult] {
        self.output
            .as_ref()
            .map(|o| o.results.as_slice())
            .unwrap_or_default()
    }

    /// Best available error code, from the reply or the task output
    pub fn error_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .or_else(|| self.output.as_ref().and_then(|o| o.code.as_deref()))
    }

    /// Best available error message, from the reply or the task output
    pub fn error_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.output.as_ref().and_then(|o| o.message.as_deref()))
            .unwrap_or("no message")
    }
}
