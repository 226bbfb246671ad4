use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Diesel model for the salon_photos table
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::salon_photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalonPhotoModel {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub url: String,
    pub photo_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert model for listing photos
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::salon_photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSalonPhoto {
    pub salon_id: Uuid,
    pub url: String,
    pub photo_order: i32,
}

impl NewSalonPhoto {
    /// Build one photo row per URL with 1-based order numbers.
    pub fn from_urls(salon_id: Uuid, urls: &[String]) -> Vec<Self> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| Self {
                salon_id,
                url: url.clone(),
                photo_order: i as i32 + 1,
            })
            .collect()
    }
}
