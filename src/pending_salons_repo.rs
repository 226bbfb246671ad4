use anyhow::Result;
use diesel::prelude::*;
use uuid::Uuid;

use crate::pending_salons::{NewPendingSalon, PendingSalonModel};
use crate::web::PgPool;

#[derive(Clone)]
pub struct PendingSalonsRepository {
    pool: PgPool,
}

impl PendingSalonsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a draft by id. The webhook never mutates or deletes drafts;
    /// expiry is owned by the listing-creation flow.
    pub async fn get_by_id(&self, pending_id: Uuid) -> Result<Option<PendingSalonModel>> {
        use crate::schema::pending_salons::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let pending: Option<PendingSalonModel> = dsl::pending_salons
                .filter(dsl::id.eq(pending_id))
                .first::<PendingSalonModel>(&mut conn)
                .optional()?;

            Ok::<Option<PendingSalonModel>, anyhow::Error>(pending)
        })
        .await??;

        Ok(result)
    }

    /// Seed a draft row. Used by tests; production drafts are written by the
    /// listing-creation flow, not this service.
    pub async fn create(&self, new_pending: NewPendingSalon) -> Result<PendingSalonModel> {
        use crate::schema::pending_salons::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted: PendingSalonModel = diesel::insert_into(dsl::pending_salons)
                .values(&new_pending)
                .get_result(&mut conn)?;

            Ok::<PendingSalonModel, anyhow::Error>(inserted)
        })
        .await??;

        Ok(result)
    }
}
