//! Coaching feedback synthesis over a vision language model.
//!
//! This crate provides:
//! - Even-stride frame sampling
//! - Escalating prompt tiers
//! - Normalization and genericity classification of model answers
//! - Bounded retries with a guaranteed-valid fallback
//! - An OpenRouter-compatible chat completions client

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod lexicon;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod sampler;
pub mod types;
pub mod validator;

pub use client::{OpenRouterClient, VisionModel};
pub use config::{OpenRouterConfig, PipelineConfig};
pub use error::{FeedbackError, FeedbackResult};
pub use lexicon::GenericityLexicon;
pub use pipeline::FeedbackPipeline;
pub use prompts::PromptEscalator;
pub use validator::{FeedbackValidator, Verdict};
