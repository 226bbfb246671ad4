//! Integration tests for the checkout-session activation flow.
//!
//! These exercise the pieces of the webhook pipeline below signature
//! verification: payload resolution, the idempotency guard, listing
//! activation with derived fields, and the partial-failure rules.
//!
//! All tests here create an isolated database from the test template and are
//! skipped when TEST_DATABASE_URL is not set.
mod common;

use chrono::Utc;
use common::TestDatabase;
use diesel::prelude::*;
use serial_test::serial;

use salonhub::activation::{ActivationError, ListingActivator};
use salonhub::listings::ListingStatus;
use salonhub::listings_repo::ListingsRepository;
use salonhub::metadata_resolver::{
    ActivationRequest, MetadataResolver, PayloadSource, SessionMetadata, validate,
};
use salonhub::payment_logs::{NewPaymentLog, SALON_LISTING_PLAN};
use salonhub::payment_logs_repo::PaymentLogsRepository;
use salonhub::pending_salons::NewPendingSalon;
use salonhub::pending_salons_repo::PendingSalonsRepository;
use salonhub::salon_payload::SalonPayload;
use salonhub::salon_photos_repo::SalonPhotosRepository;
use salonhub::validation_logs::{NewValidationLog, categories};
use salonhub::validation_logs_repo::ValidationLogsRepository;

fn request(session_id: &str) -> ActivationRequest {
    ActivationRequest {
        session_id: session_id.to_string(),
        user_id: "user-42".to_string(),
        pricing_tier: "annual".to_string(),
        featured: true,
        salon_name: "Lotus Nails".to_string(),
        payload: SalonPayload {
            salon_name: Some("Lotus Nails".to_string()),
            description_en: Some("Established salon".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            photos: vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "https://cdn.example.com/b.jpg".to_string(),
            ],
            ..Default::default()
        },
    }
}

#[tokio::test]
#[serial]
async fn activation_writes_listing_photos_and_audit_row() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let pool = test_db.pool();

    let activator = ListingActivator::new(pool.clone());
    let outcome = activator
        .activate(&request("cs_test_full"), Utc::now())
        .await
        .expect("activation should succeed");

    assert!(outcome.photos_written);
    assert!(outcome.audit_logged);

    let listing = &outcome.listing;
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(listing.location, "Austin, TX");
    assert!(listing.is_featured);
    assert!(listing.featured_until.is_some());
    assert_eq!(listing.business_data["photos"][0], "https://cdn.example.com/a.jpg");

    let photos = SalonPhotosRepository::new(pool.clone())
        .get_for_salon(listing.id)
        .await
        .expect("photos should load");
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].photo_order, 1);
    assert_eq!(photos[1].photo_order, 2);

    let guard = PaymentLogsRepository::new(pool)
        .exists("cs_test_full", SALON_LISTING_PLAN)
        .await
        .expect("guard check should succeed");
    assert!(guard, "audit row must satisfy the idempotency guard");
}

#[tokio::test]
#[serial]
async fn redelivered_session_cannot_create_a_second_listing() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let pool = test_db.pool();

    let activator = ListingActivator::new(pool.clone());
    let first = activator
        .activate(&request("cs_test_replay"), Utc::now())
        .await
        .expect("first activation should succeed");

    // A replay that somehow got past the guard check hits the unique index
    let second = activator.activate(&request("cs_test_replay"), Utc::now()).await;
    match second {
        Err(ActivationError::AlreadyActive(session_id)) => {
            assert_eq!(session_id, "cs_test_replay");
        }
        other => panic!("expected AlreadyActive, got {:?}", other.map(|o| o.listing.id)),
    }

    let listing = ListingsRepository::new(pool.clone())
        .get_by_session_id("cs_test_replay")
        .await
        .expect("lookup should succeed")
        .expect("listing should exist");
    assert_eq!(listing.id, first.listing.id);

    let logs = PaymentLogsRepository::new(pool)
        .get_by_session_id("cs_test_replay")
        .await
        .expect("audit rows should load");
    assert_eq!(logs.len(), 1, "exactly one audit row per session");
}

#[tokio::test]
#[serial]
async fn payment_log_unique_pair_swallows_duplicate_inserts() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let repo = PaymentLogsRepository::new(test_db.pool());

    let listing_id = {
        let activator = ListingActivator::new(test_db.pool());
        activator
            .activate(&request("cs_test_pair"), Utc::now())
            .await
            .expect("activation should succeed")
            .listing
            .id
    };

    let duplicate = repo
        .create(NewPaymentLog {
            stripe_session_id: "cs_test_pair".to_string(),
            plan_type: SALON_LISTING_PLAN.to_string(),
            user_id: "user-42".to_string(),
            salon_id: listing_id,
        })
        .await
        .expect("duplicate insert should not error");
    assert!(duplicate.is_none(), "losing writer gets None, not a row");
}

#[tokio::test]
#[serial]
async fn pending_fallback_resolves_like_inline_form_data() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let pool = test_db.pool();

    let pending = PendingSalonsRepository::new(pool.clone())
        .create(NewPendingSalon {
            user_id: Some("user-42".to_string()),
            salon_name: Some("Lotus Nails".to_string()),
            description_en: Some("Established salon".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            asking_price: Some("150000".to_string()),
            photos: vec!["https://cdn.example.com/a.jpg".to_string()],
            ..Default::default()
        })
        .await
        .expect("pending row should insert");

    let mut meta = SessionMetadata::default();
    meta.user_id = Some("user-42".to_string());
    meta.pricing_tier = Some("premium".to_string());
    meta.pending_salon_id = Some(pending.id.to_string());

    let resolver = MetadataResolver::new(PendingSalonsRepository::new(pool), true);
    let resolved = resolver.resolve(&meta).await;
    assert_eq!(resolved.source, PayloadSource::PendingSalon);
    assert!(resolved.degraded.is_none());

    let request = validate("cs_test_fallback", &meta, resolved).expect("should validate");
    assert_eq!(request.salon_name, "Lotus Nails");
    assert_eq!(request.payload.city.as_deref(), Some("Austin"));
    assert_eq!(request.payload.asking_price.as_deref(), Some("150000"));
    assert_eq!(
        request.payload.photos,
        vec!["https://cdn.example.com/a.jpg".to_string()]
    );
}

#[tokio::test]
#[serial]
async fn fallback_disabled_leaves_payload_empty() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };

    let pending = PendingSalonsRepository::new(test_db.pool())
        .create(NewPendingSalon {
            salon_name: Some("Lotus Nails".to_string()),
            ..Default::default()
        })
        .await
        .expect("pending row should insert");

    let mut meta = SessionMetadata::default();
    meta.pending_salon_id = Some(pending.id.to_string());

    let resolver = MetadataResolver::new(PendingSalonsRepository::new(test_db.pool()), false);
    let resolved = resolver.resolve(&meta).await;
    assert_eq!(resolved.source, PayloadSource::Empty);
    assert!(resolved.degraded.unwrap().contains("disabled"));
}

#[tokio::test]
#[serial]
async fn photo_insert_failure_does_not_lose_the_listing() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let pool = test_db.pool();

    // Force the photo insert to fail after the listing insert succeeds
    {
        let mut conn = pool.get().expect("connection");
        diesel::sql_query("DROP TABLE salon_photos")
            .execute(&mut conn)
            .expect("drop should succeed");
    }

    let activator = ListingActivator::new(pool.clone());
    let outcome = activator
        .activate(&request("cs_test_partial"), Utc::now())
        .await
        .expect("activation must survive a photo failure");

    assert!(!outcome.photos_written);
    assert!(outcome.audit_logged);

    let listing = ListingsRepository::new(pool)
        .get_by_session_id("cs_test_partial")
        .await
        .expect("lookup should succeed");
    assert!(listing.is_some(), "listing must stand without its photos");
}

#[tokio::test]
#[serial]
async fn validation_log_context_round_trips() {
    let Some(test_db) = TestDatabase::try_new().await else {
        return;
    };
    let repo = ValidationLogsRepository::new(test_db.pool());

    repo.record(
        NewValidationLog::webhook(
            "cs_test_audit",
            categories::METADATA,
            "missing required metadata: user_id",
        )
        .with_context(serde_json::json!({ "missing": ["user_id"] })),
    )
    .await;

    let entries = repo
        .get_by_category(categories::METADATA)
        .await
        .expect("entries should load");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record_id, "cs_test_audit");
    assert_eq!(entries[0].context.as_ref().unwrap()["missing"][0], "user_id");
}
