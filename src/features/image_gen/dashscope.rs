//! DashScope (Alibaba Cloud Model Studio) text-to-image client
//!
//! Submits image-synthesis tasks in async mode and polls the task endpoint until the task
//! finishes.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Exponential poll interval, non-JSON error bodies kept as messages
//! - 1.0.0: Initial release

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use super::service::{ImageSynthesis, SynthesisRequest, TaskResponse, STATUS_OK};

const SYNTHESIS_PATH: &str = "/api/v1/services/aigc/text2image/image-synthesis";
const TASKS_PATH: &str = "/api/v1/tasks";

/// Timeout for each individual HTTP call; waiting for a task has no overall limit
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const INITIAL_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct SubmitBody<'a> {
    model: &'a str,
    input: SubmitInput<'a>,
    parameters: SubmitParameters<'a>,
}

#[derive(Serialize)]
struct SubmitInput<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
}

#[derive(Serialize)]
struct SubmitParameters<'a> {
    n: u32,
    size: &'a str,
}

/// HTTP client for the DashScope image-synthesis API
#[derive(Clone)]
pub struct DashScopeClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
    max_poll_interval: Duration,
}

impl DashScopeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: INITIAL_POLL_INTERVAL,
            max_poll_interval: MAX_POLL_INTERVAL,
        })
    }

    /// Override the task polling schedule (initial interval, doubling up to `max`)
    pub fn with_poll_interval(mut self, initial: Duration, max: Duration) -> Self {
        self.poll_interval = initial;
        self.max_poll_interval = max.max(initial);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}{}/{}", self.base_url, TASKS_PATH, task_id)
    }

    /// Turn an HTTP reply into a `TaskResponse` carrying its status code.
    ///
    /// Error replies that are not JSON keep their body as the message; a success reply
    /// that cannot be parsed is an error.
    async fn read_task_response(response: reqwest::Response) -> Result<TaskResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;

        let mut parsed = if body.trim().is_empty() {
            TaskResponse::default()
        } else {
            match serde_json::from_str::<TaskResponse>(&body) {
                Ok(parsed) => parsed,
                Err(e) if status == STATUS_OK => {
                    return Err(anyhow::anyhow!(
                        "Malformed DashScope response: {}",
                        e
                    ));
                }
                Err(_) => TaskResponse {
                    message: Some(body),
                    ..Default::default()
                },
            }
        };
        parsed.status_code = status;
        Ok(parsed)
    }
}

#[async_trait]
impl ImageSynthesis for DashScopeClient {
    async fn submit(&self, api_key: &str, request: &SynthesisRequest) -> Result<TaskResponse> {
        let body = SubmitBody {
            model: &request.model,
            input: SubmitInput {
                prompt: &request.prompt,
                negative_prompt: request.negative_prompt.as_deref(),
            },
            parameters: SubmitParameters {
                n: request.n,
                size: &request.size,
            },
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, SYNTHESIS_PATH))
            .bearer_auth(api_key)
            .header("X-DashScope-Async", "enable")
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("DashScope submit request failed: {}", e))?;

        Self::read_task_response(response).await
    }

    async fn wait(&self, task: &TaskResponse, api_key: &str) -> Result<TaskResponse> {
        let task_id = task
            .task_id()
            .ok_or_else(|| anyhow::anyhow!("Submission response carries no task id"))?;
        let url = self.task_url(task_id);
        let mut interval = self.poll_interval;

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(api_key)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("DashScope task query failed: {}", e))?;
            let polled = Self::read_task_response(response).await?;

            if !polled.is_success() {
                warn!(
                    "Task query rejected | Task: {} | Status: {}",
                    task_id, polled.status_code
                );
                return Ok(polled);
            }

            match polled.task_status() {
                Some(status) if status.is_terminal() => {
                    debug!("Task finished | Task: {} | State: {}", task_id, status.as_str());
                    return Ok(polled);
                }
                Some(status) => {
                    debug!(
                        "Task in progress | Task: {} | State: {} | Next poll: {:?}",
                        task_id,
                        status.as_str(),
                        interval
                    );
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "Task query for {} returned no task status",
                        task_id
                    ));
                }
            }

            sleep(interval).await;
            interval = (interval * 2).min(self.max_poll_interval);
        }
    }
}

impl std::fmt::Debug for DashScopeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashScopeClient")
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
