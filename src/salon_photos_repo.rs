use anyhow::Result;
use diesel::prelude::*;
use uuid::Uuid;

use crate::salon_photos::{NewSalonPhoto, SalonPhotoModel};
use crate::web::PgPool;

#[derive(Clone)]
pub struct SalonPhotosRepository {
    pool: PgPool,
}

impl SalonPhotosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one row per photo in a single statement.
    pub async fn insert_batch(&self, photos: Vec<NewSalonPhoto>) -> Result<usize> {
        use crate::schema::salon_photos::dsl;

        let pool = self.pool.clone();
        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted = diesel::insert_into(dsl::salon_photos)
                .values(&photos)
                .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(inserted)
        })
        .await??;

        Ok(count)
    }

    /// Photos for a listing, in display order
    pub async fn get_for_salon(&self, salon_id: Uuid) -> Result<Vec<SalonPhotoModel>> {
        use crate::schema::salon_photos::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let photos: Vec<SalonPhotoModel> = dsl::salon_photos
                .filter(dsl::salon_id.eq(salon_id))
                .order_by(dsl::photo_order.asc())
                .load::<SalonPhotoModel>(&mut conn)?;

            Ok::<Vec<SalonPhotoModel>, anyhow::Error>(photos)
        })
        .await??;

        Ok(result)
    }
}
