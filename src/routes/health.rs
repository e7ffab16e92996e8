//! Health check endpoint for container orchestration.
//!
//! Liveness only: answers as long as the process can serve HTTP, whether or
//! not the dataset is available. The dashboard itself reports dataset problems.

/// Health check handler.
pub async fn health() -> &'static str {
    "ok"
}
