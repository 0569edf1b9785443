//! Watermark detection for product images.
//!
//! The pipeline only sees the [`ImageChecker`] trait. Two HTTP-backed
//! implementations are provided: [`WatermarkServiceClient`] posts to a
//! watermark-detection service, and [`VisionModelClient`] asks an
//! OpenAI-compatible chat-completions endpoint directly. [`WatermarkChecker`]
//! picks one from [`qm_core::AppConfig`].

pub mod checker;
pub mod error;
pub mod model;
pub mod service;
pub mod types;

mod http;
mod retry;

pub use checker::{ClientOptions, ImageChecker, WatermarkChecker};
pub use error::VisionError;
pub use model::VisionModelClient;
pub use service::WatermarkServiceClient;
pub use types::{ImageCheckRequest, WatermarkVerdict, WATERMARK_MESSAGE};
