use anyhow::Result;
use diesel::prelude::*;

use crate::payment_logs::{NewPaymentLog, PaymentLogModel};
use crate::web::PgPool;

#[derive(Clone)]
pub struct PaymentLogsRepository {
    pool: PgPool,
}

impl PaymentLogsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a session has already been processed for a plan type
    /// (idempotency guard). Runs before any listing-creation side effect.
    pub async fn exists(&self, session_id: &str, plan_type: &str) -> Result<bool> {
        use crate::schema::payment_logs::dsl;

        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let plan_type = plan_type.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let exists: bool = diesel::select(diesel::dsl::exists(
                dsl::payment_logs
                    .filter(dsl::stripe_session_id.eq(&session_id))
                    .filter(dsl::plan_type.eq(&plan_type)),
            ))
            .get_result(&mut conn)?;

            Ok::<bool, anyhow::Error>(exists)
        })
        .await??;

        Ok(result)
    }

    /// Record a processed session.
    ///
    /// The unique index on (stripe_session_id, plan_type) makes this safe
    /// under concurrent redelivery: the losing writer gets None rather than a
    /// second row.
    pub async fn create(&self, new_log: NewPaymentLog) -> Result<Option<PaymentLogModel>> {
        use crate::schema::payment_logs::dsl;

        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted: Option<PaymentLogModel> = diesel::insert_into(dsl::payment_logs)
                .values(&new_log)
                .on_conflict((dsl::stripe_session_id, dsl::plan_type))
                .do_nothing()
                .get_result(&mut conn)
                .optional()?;

            Ok::<Option<PaymentLogModel>, anyhow::Error>(inserted)
        })
        .await??;

        Ok(result)
    }

    /// Audit rows for a session, newest first
    pub async fn get_by_session_id(&self, session_id: &str) -> Result<Vec<PaymentLogModel>> {
        use crate::schema::payment_logs::dsl;

        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let logs: Vec<PaymentLogModel> = dsl::payment_logs
                .filter(dsl::stripe_session_id.eq(&session_id))
                .order_by(dsl::created_at.desc())
                .load::<PaymentLogModel>(&mut conn)?;

            Ok::<Vec<PaymentLogModel>, anyhow::Error>(logs)
        })
        .await??;

        Ok(result)
    }
}
