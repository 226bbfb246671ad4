pub mod status;
pub mod webhooks;

pub use status::*;
pub use webhooks::*;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use serde_json::json;

/// Standard single-object response wrapper
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// JSON error body in the shape the payment provider and operators expect:
/// `{"error": "<message>"}`
pub fn json_error(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(json!({ "error": message })))
}

/// Webhook acknowledgment body: `{"received": true}`
pub fn received_ack() -> Json<serde_json::Value> {
    Json(json!({ "received": true }))
}
