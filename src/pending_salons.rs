use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Diesel model for the pending_salons table.
///
/// Rows are created by the listing form before checkout and are read-only to
/// this service; the fallback path of the metadata resolver maps them onto a
/// [`crate::salon_payload::SalonPayload`].
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::pending_salons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PendingSalonModel {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub salon_name: Option<String>,
    pub description_en: Option<String>,
    pub description_vi: Option<String>,
    pub reason_for_selling: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub asking_price: Option<String>,
    pub monthly_rent: Option<String>,
    pub monthly_revenue: Option<String>,
    pub square_footage: Option<String>,
    pub station_count: Option<String>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_wax_room: Option<bool>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert model, used only by tests seeding draft rows.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = crate::schema::pending_salons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPendingSalon {
    pub user_id: Option<String>,
    pub salon_name: Option<String>,
    pub description_en: Option<String>,
    pub description_vi: Option<String>,
    pub reason_for_selling: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub asking_price: Option<String>,
    pub monthly_rent: Option<String>,
    pub monthly_revenue: Option<String>,
    pub square_footage: Option<String>,
    pub station_count: Option<String>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_wax_room: Option<bool>,
    pub photos: Vec<String>,
}
