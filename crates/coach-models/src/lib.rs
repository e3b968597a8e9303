//! Shared data models for the swing coaching backend.
//!
//! This crate provides Serde-serializable types for:
//! - Extracted video frames and their detail level
//! - Attempt prompts and pipeline results
//! - The feedback response contract
//! - Training sessions

pub mod feedback;
pub mod frame;
pub mod session;

pub use feedback::{AttemptPrompt, FeedbackResponse, FeedbackSource, PipelineResult};
pub use frame::{Frame, FrameDetail, FrameError, FrameImage, SampledFrame, WireFrame};
pub use session::Session;
