//! Status endpoint for build information and uptime

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use super::DataResponse;

/// Server start time - initialized when the server starts
static SERVER_START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn init_server_start_time() {
    SERVER_START_TIME.get_or_init(Instant::now);
}

/// Status response with build and runtime information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    /// Git version from `git describe --tags --always --dirty`
    pub version: &'static str,
    /// Git commit SHA
    pub git_commit: &'static str,
    /// Build timestamp (ISO 8601)
    pub build_timestamp: &'static str,
    /// Target triple (e.g., x86_64-unknown-linux-gnu)
    pub target: &'static str,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Human-readable uptime
    pub uptime_human: String,
}

/// Format seconds into a human-readable duration string
fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, secs)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// GET /status
pub async fn get_status() -> impl IntoResponse {
    let uptime_seconds = SERVER_START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    Json(DataResponse {
        data: StatusInfo {
            version: env!("VERGEN_GIT_DESCRIBE"),
            git_commit: env!("VERGEN_GIT_SHA"),
            build_timestamp: env!("VERGEN_BUILD_TIMESTAMP"),
            target: env!("VERGEN_CARGO_TARGET_TRIPLE"),
            uptime_seconds,
            uptime_human: format_duration(uptime_seconds),
        },
    })
}
