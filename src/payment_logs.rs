use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plan discriminator for salon listing purchases. The idempotency guard is
/// keyed on (stripe_session_id, plan_type) so other checkout flows sharing
/// the table cannot collide with listing activations.
pub const SALON_LISTING_PLAN: &str = "salon_listing";

/// Diesel model for the payment_logs table
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::payment_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentLogModel {
    pub id: Uuid,
    pub stripe_session_id: String,
    pub plan_type: String,
    pub user_id: String,
    pub salon_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert model for payment audit rows.
///
/// Written only after the listing row exists, so salon_id always references
/// a real listing.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::payment_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPaymentLog {
    pub stripe_session_id: String,
    pub plan_type: String,
    pub user_id: String,
    pub salon_id: Uuid,
}
