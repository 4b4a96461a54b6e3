//! # Image Generation Feature
//!
//! Text-to-image through Alibaba Cloud DashScope (Tongyi Wanxiang models).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod adapter;
pub mod dashscope;
pub mod service;

pub use adapter::{GenerationError, GenerationRequest, ImageRequestAdapter};
pub use dashscope::DashScopeClient;
pub use service::{
    ImageResult, ImageSynthesis, SynthesisRequest, TaskOutput, TaskResponse, TaskStatus,
};
