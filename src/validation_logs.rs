use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag for every sink entry written by the webhook handler.
pub const WEBHOOK_SOURCE: &str = "webhook-salon-posting";

/// Failure categories recorded for operator triage.
pub mod categories {
    pub const METADATA: &str = "salon_metadata_error";
    pub const CREATION: &str = "salon_creation_error";
    pub const PAYMENT_LOG: &str = "payment_log_error";
}

/// Diesel model for the validation_logs table
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::validation_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ValidationLogModel {
    pub id: Uuid,
    pub record_id: String,
    pub category: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Insert model for sink entries. `record_id` holds whichever identifier is
/// known at the failure point: the checkout session id, or the listing id
/// once one exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::validation_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewValidationLog {
    pub record_id: String,
    pub category: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub source: String,
}

impl NewValidationLog {
    pub fn webhook(record_id: impl Into<String>, category: &str, message: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            category: category.to_string(),
            message: message.into(),
            context: None,
            source: WEBHOOK_SOURCE.to_string(),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}
