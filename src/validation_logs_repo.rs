use anyhow::Result;
use diesel::prelude::*;
use tracing::error;

use crate::validation_logs::{NewValidationLog, ValidationLogModel};
use crate::web::PgPool;

#[derive(Clone)]
pub struct ValidationLogsRepository {
    pool: PgPool,
}

impl ValidationLogsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a sink entry.
    pub async fn append(&self, entry: NewValidationLog) -> Result<ValidationLogModel> {
        use crate::schema::validation_logs::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted: ValidationLogModel = diesel::insert_into(dsl::validation_logs)
                .values(&entry)
                .get_result(&mut conn)?;

            Ok::<ValidationLogModel, anyhow::Error>(inserted)
        })
        .await??;

        Ok(result)
    }

    /// Best-effort append. The sink is strictly auxiliary: a failed write is
    /// logged to the diagnostic stream and never changes the HTTP response
    /// already chosen by the caller.
    pub async fn record(&self, entry: NewValidationLog) {
        let category = entry.category.clone();
        if let Err(e) = self.append(entry).await {
            error!(category = %category, error = %e, "Failed to write validation log entry");
        }
    }

    /// Entries in a category, newest first
    pub async fn get_by_category(&self, category: &str) -> Result<Vec<ValidationLogModel>> {
        use crate::schema::validation_logs::dsl;

        let pool = self.pool.clone();
        let category = category.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let entries: Vec<ValidationLogModel> = dsl::validation_logs
                .filter(dsl::category.eq(&category))
                .order_by(dsl::created_at.desc())
                .load::<ValidationLogModel>(&mut conn)?;

            Ok::<Vec<ValidationLogModel>, anyhow::Error>(entries)
        })
        .await??;

        Ok(result)
    }
}
