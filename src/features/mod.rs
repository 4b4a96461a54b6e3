//! # Features
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod image_gen;

pub use image_gen::{
    DashScopeClient, GenerationError, GenerationRequest, ImageRequestAdapter, ImageSynthesis,
};
