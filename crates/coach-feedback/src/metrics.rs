//! Feedback pipeline metrics.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ATTEMPTS_TOTAL: &str = "coach_feedback_attempts_total";
    pub const RESULTS_TOTAL: &str = "coach_feedback_results_total";
    pub const MODEL_LATENCY_SECONDS: &str = "coach_feedback_model_latency_seconds";
}

/// Record one attempt outcome (`accepted`, `rejected`, `unnormalizable`, `failed`).
pub fn record_attempt(attempt: u32, outcome: &'static str) {
    let labels = [("attempt", attempt.to_string()), ("outcome", outcome.to_string())];
    counter!(names::ATTEMPTS_TOTAL, &labels).increment(1);
}

/// Record where the final feedback came from.
pub fn record_result(source: &'static str) {
    counter!(names::RESULTS_TOTAL, "source" => source).increment(1);
}

/// Record the wall-clock time of one model call.
pub fn record_model_latency(model: &str, duration_secs: f64) {
    histogram!(names::MODEL_LATENCY_SECONDS, "model" => model.to_string()).record(duration_secs);
}
