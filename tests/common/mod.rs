//! Shared helpers for database-backed integration tests.
//!
//! Each test gets its own database cloned from the `salonhub_test_template`
//! template, so tests never see each other's rows. The template is created
//! and migrated once per test session.
//!
//! Tests that need a database are gated on `TEST_DATABASE_URL`; when it is
//! not set they log a note and pass without exercising anything. The URL
//! should point at a `salonhub_test` database, e.g.
//! `postgresql://localhost/salonhub_test`.

use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::sync::Once;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

const TEMPLATE_DB: &str = "salonhub_test_template";

static TEMPLATE_READY: Once = Once::new();

type PgPool = Pool<ConnectionManager<PgConnection>>;

fn base_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("TEST_DATABASE_URL").ok()
}

fn admin_url(base_url: &str) -> String {
    base_url
        .replace("/salonhub_test_template", "/postgres")
        .replace("/salonhub_test", "/postgres")
}

fn template_url(base_url: &str) -> String {
    base_url.replace("/salonhub_test", &format!("/{}", TEMPLATE_DB))
}

/// Create the template database if needed and bring its schema up to date.
/// Runs once per test session.
fn ensure_template_migrated(base_url: &str) {
    TEMPLATE_READY.call_once(|| {
        let admin_url = admin_url(base_url);
        let template_url = template_url(base_url);

        if let Ok(mut admin_conn) = PgConnection::establish(&admin_url) {
            let exists = diesel::sql_query(
                "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = 'salonhub_test_template')",
            )
            .get_result::<TemplateExists>(&mut admin_conn)
            .map(|r| r.exists);

            if exists != Ok(true) {
                let _ = diesel::sql_query("CREATE DATABASE salonhub_test_template")
                    .execute(&mut admin_conn);
            }

            // Allow connections while migrations run
            let _ = diesel::sql_query(
                "UPDATE pg_database SET datistemplate = FALSE, datallowconn = TRUE \
                 WHERE datname = 'salonhub_test_template'",
            )
            .execute(&mut admin_conn);

            drop(admin_conn);
        }

        if let Ok(mut template_conn) = PgConnection::establish(&template_url) {
            if let Err(e) = template_conn.run_pending_migrations(MIGRATIONS) {
                eprintln!("Warning: failed to migrate test template: {}", e);
            }
            drop(template_conn);
        }

        if let Ok(mut admin_conn) = PgConnection::establish(&admin_url) {
            let _ = diesel::sql_query(
                "UPDATE pg_database SET datistemplate = TRUE, datallowconn = FALSE \
                 WHERE datname = 'salonhub_test_template'",
            )
            .execute(&mut admin_conn);
        }
    });
}

#[derive(QueryableByName)]
struct TemplateExists {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    exists: bool,
}

/// An isolated test database cloned from the migrated template.
///
/// Dropping the struct drops the database, including when the test panics.
/// Tests using this are marked `#[serial]` so template cloning never races.
pub struct TestDatabase {
    db_name: String,
    pool: PgPool,
    admin_url: String,
}

impl TestDatabase {
    /// Creates a fresh database for one test, or `None` when
    /// `TEST_DATABASE_URL` is not set.
    pub async fn try_new() -> Option<Self> {
        let base_url = match base_url() {
            Some(url) => url,
            None => {
                eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
                return None;
            }
        };

        Some(
            Self::create(&base_url)
                .await
                .expect("failed to create test database"),
        )
    }

    async fn create(base_url: &str) -> Result<Self> {
        ensure_template_migrated(base_url);

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let db_name = format!("salonhub_test_{}", &suffix[..16]);
        let admin_url = admin_url(base_url);

        {
            let admin_url = admin_url.clone();
            let db_name = db_name.clone();
            tokio::task::spawn_blocking(move || {
                let mut conn = PgConnection::establish(&admin_url)
                    .context("failed to connect to PostgreSQL. Is it running?")?;

                // Nothing else may hold the template open during CREATE DATABASE
                diesel::sql_query(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                     WHERE datname = 'salonhub_test_template' AND pid <> pg_backend_pid()",
                )
                .execute(&mut conn)
                .context("failed to terminate template connections")?;

                diesel::sql_query(format!(
                    "CREATE DATABASE \"{}\" TEMPLATE salonhub_test_template",
                    db_name
                ))
                .execute(&mut conn)
                .with_context(|| format!("failed to create test database {}", db_name))?;

                Ok::<(), anyhow::Error>(())
            })
            .await
            .context("database creation task panicked")??;
        }

        let test_db_url = base_url
            .replace("/salonhub_test_template", &format!("/{}", db_name))
            .replace("/salonhub_test", &format!("/{}", db_name));

        let manager = ConnectionManager::<PgConnection>::new(&test_db_url);
        let pool = Pool::builder()
            .max_size(5)
            .build(manager)
            .with_context(|| format!("failed to build pool for {}", db_name))?;

        Ok(TestDatabase {
            db_name,
            pool,
            admin_url,
        })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &str {
        &self.db_name
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.admin_url) {
            let _ = diesel::sql_query(format!(
                "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
                self.db_name
            ))
            .execute(&mut conn);
        }
    }
}
