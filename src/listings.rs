use chrono::{DateTime, Duration, Months, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::ListingStatus")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[db_enum(rename = "active")]
    Active,
    #[db_enum(rename = "expired")]
    Expired,
    #[db_enum(rename = "suspended")]
    Suspended,
    #[db_enum(rename = "sold")]
    Sold,
}

/// Listing lifetime purchased at checkout.
///
/// Parsing is total: tier strings we do not recognize get the basic
/// one-month lifetime instead of failing, so a new tier added on the
/// frontend cannot drop a paid activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingTier {
    Annual,
    Premium,
    Gold,
    Basic,
}

impl PricingTier {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "annual" => PricingTier::Annual,
            "premium" => PricingTier::Premium,
            "gold" => PricingTier::Gold,
            _ => PricingTier::Basic,
        }
    }

    /// Listing lifetime in calendar months.
    pub fn listing_months(self) -> u32 {
        match self {
            PricingTier::Annual => 12,
            PricingTier::Premium | PricingTier::Gold => 3,
            PricingTier::Basic => 1,
        }
    }

    /// Expiration instant for a listing activated at `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        // checked_add_months only fails on date overflow far outside any
        // realistic clock value
        now.checked_add_months(Months::new(self.listing_months()))
            .unwrap_or(now)
    }
}

/// Featured placement window for listings that bought the featured addon.
pub fn featured_until(featured: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    featured.then(|| now + Duration::days(30))
}

/// API model for activated salon listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pricing_tier: String,
    pub status: ListingStatus,
    pub expires_at: DateTime<Utc>,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub business_data: serde_json::Value,
    pub services_data: serde_json::Value,
    pub stripe_session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Diesel model for the salon_listings table
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::salon_listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingModel {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pricing_tier: String,
    pub status: ListingStatus,
    pub expires_at: DateTime<Utc>,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub business_data: serde_json::Value,
    pub services_data: serde_json::Value,
    pub stripe_session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for new listings
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::salon_listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewListing {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pricing_tier: String,
    pub status: ListingStatus,
    pub expires_at: DateTime<Utc>,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub business_data: serde_json::Value,
    pub services_data: serde_json::Value,
    pub stripe_session_id: String,
}

impl From<ListingModel> for Listing {
    fn from(model: ListingModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            location: model.location,
            phone: model.phone,
            email: model.email,
            pricing_tier: model.pricing_tier,
            status: model.status,
            expires_at: model.expires_at,
            is_featured: model.is_featured,
            featured_until: model.featured_until,
            business_data: model.business_data,
            services_data: model.services_data,
            stripe_session_id: model.stripe_session_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
