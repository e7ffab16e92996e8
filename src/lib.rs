//! Screentime - screen time analytics dashboard
//!
//! Serves an interactive dashboard over a CSV dataset of children's screen
//! time, sleep, outdoor activity and reported health issues, plus a JSON API,
//! CSV export and a liveness probe for container orchestration.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;

pub use error::*;
