use anyhow::Result;
use diesel::prelude::*;
use uuid::Uuid;

use crate::listings::{Listing, ListingModel, NewListing};
use crate::web::PgPool;

#[derive(Clone)]
pub struct ListingsRepository {
    pool: PgPool,
}

impl ListingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an activated listing.
    ///
    /// The table has a unique index on stripe_session_id; callers inspect
    /// the error for a unique violation to detect a concurrent activation of
    /// the same checkout session.
    pub async fn create(&self, new_listing: NewListing) -> Result<Listing> {
        use crate::schema::salon_listings::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted: ListingModel = diesel::insert_into(dsl::salon_listings)
                .values(&new_listing)
                .get_result(&mut conn)?;

            Ok::<ListingModel, anyhow::Error>(inserted)
        })
        .await??;

        Ok(result.into())
    }

    /// Get a listing by ID
    pub async fn get_by_id(&self, listing_id: Uuid) -> Result<Option<Listing>> {
        use crate::schema::salon_listings::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let listing: Option<ListingModel> = dsl::salon_listings
                .filter(dsl::id.eq(listing_id))
                .first::<ListingModel>(&mut conn)
                .optional()?;

            Ok::<Option<ListingModel>, anyhow::Error>(listing)
        })
        .await??;

        Ok(result.map(|model| model.into()))
    }

    /// Get the listing created for a checkout session, if any
    pub async fn get_by_session_id(&self, session_id: &str) -> Result<Option<Listing>> {
        use crate::schema::salon_listings::dsl;

        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let listing: Option<ListingModel> = dsl::salon_listings
                .filter(dsl::stripe_session_id.eq(&session_id))
                .first::<ListingModel>(&mut conn)
                .optional()?;

            Ok::<Option<ListingModel>, anyhow::Error>(listing)
        })
        .await??;

        Ok(result.map(|model| model.into()))
    }
}

/// True when the error chain bottoms out in a Postgres unique violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<diesel::result::Error>(),
        Some(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))
    )
}
