//! Axum HTTP API for swing coaching feedback.
//!
//! This crate provides:
//! - Bearer token authentication
//! - Session lookup and feedback persistence through the backend gateway
//! - Frame extraction through the pose service
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod frames;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, UpstreamError};
pub use routes::create_router;
pub use state::AppState;
