use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::listings::{Listing, ListingStatus, NewListing, PricingTier, featured_until};
use crate::listings_repo::{ListingsRepository, is_unique_violation};
use crate::metadata_resolver::ActivationRequest;
use crate::payment_logs::{NewPaymentLog, SALON_LISTING_PLAN};
use crate::payment_logs_repo::PaymentLogsRepository;
use crate::salon_payload::SalonPayload;
use crate::salon_photos::NewSalonPhoto;
use crate::salon_photos_repo::SalonPhotosRepository;
use crate::validation_logs::{NewValidationLog, categories};
use crate::validation_logs_repo::ValidationLogsRepository;
use crate::web::PgPool;

/// Section divider between the English and Vietnamese descriptions.
const VIETNAMESE_DIVIDER: &str = "--- Tiếng Việt ---";

/// Stored description when the draft has neither an English description nor
/// a reason for selling.
const DEFAULT_DESCRIPTION: &str = "Salon for sale";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Bilingual description: English text first (falling back to the reason for
/// selling, then a fixed default), then the Vietnamese text behind a divider
/// when present.
pub fn compose_description(payload: &SalonPayload) -> String {
    let base = non_blank(&payload.description_en)
        .or_else(|| non_blank(&payload.reason_for_selling))
        .unwrap_or(DEFAULT_DESCRIPTION);

    match non_blank(&payload.description_vi) {
        Some(vi) => format!("{base}\n\n{VIETNAMESE_DIVIDER}\n\n{vi}"),
        None => base.to_string(),
    }
}

/// Display location: address, city, state, zip joined with ", ", skipping
/// blank parts; city alone, then empty string, as fallbacks.
pub fn compose_location(payload: &SalonPayload) -> String {
    let joined = [
        &payload.address,
        &payload.city,
        &payload.state,
        &payload.zip_code,
    ]
    .into_iter()
    .filter_map(non_blank)
    .collect::<Vec<_>>()
    .join(", ");

    if joined.is_empty() {
        payload.city.clone().unwrap_or_default()
    } else {
        joined
    }
}

/// Financial and operational details, stored as one JSONB column.
///
/// Carries a redundant copy of the photo URL list so the column stays
/// self-contained when queried without the photo table.
pub fn business_data(payload: &SalonPayload) -> serde_json::Value {
    json!({
        "asking_price": payload.asking_price,
        "monthly_rent": payload.monthly_rent,
        "monthly_revenue": payload.monthly_revenue,
        "square_footage": payload.square_footage,
        "reason_for_selling": payload.reason_for_selling,
        "photos": payload.photos,
    })
}

/// Service and amenity details, stored as one JSONB column. Also carries the
/// redundant photo URL list.
pub fn services_data(payload: &SalonPayload) -> serde_json::Value {
    json!({
        "station_count": payload.station_count,
        "has_parking": payload.has_parking,
        "has_laundry": payload.has_laundry,
        "has_wax_room": payload.has_wax_room,
        "photos": payload.photos,
    })
}

/// Everything the activator will write, computed up front from the validated
/// request. Building the plan is pure so the derived-field rules are
/// testable without a database.
#[derive(Debug, Clone)]
pub struct ActivationPlan {
    pub new_listing: NewListing,
    pub photo_urls: Vec<String>,
}

impl ActivationPlan {
    pub fn build(request: &ActivationRequest, now: DateTime<Utc>) -> Self {
        let tier = PricingTier::parse(&request.pricing_tier);
        let payload = &request.payload;

        let new_listing = NewListing {
            user_id: request.user_id.clone(),
            name: request.salon_name.clone(),
            description: compose_description(payload),
            location: compose_location(payload),
            phone: payload.phone.clone(),
            email: payload.email.clone(),
            pricing_tier: request.pricing_tier.clone(),
            status: ListingStatus::Active,
            expires_at: tier.expires_at(now),
            is_featured: request.featured,
            featured_until: featured_until(request.featured, now),
            business_data: business_data(payload),
            services_data: services_data(payload),
            stripe_session_id: request.session_id.clone(),
        };

        Self {
            new_listing,
            photo_urls: payload.photos.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ActivationError {
    /// The unique index on stripe_session_id fired: another delivery of this
    /// session already created the listing. Treated as already processed.
    #[error("listing already exists for session {0}")]
    AlreadyActive(String),

    /// The listing insert itself failed. The whole activation is abandoned;
    /// the provider's redelivery is the retry mechanism, and no audit row
    /// was written so the redelivery passes the idempotency guard.
    #[error("failed to insert listing for session {session_id}")]
    ListingInsert {
        session_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Infrastructure failure before the listing insert reached the
    /// database (pool exhaustion, task join).
    #[error("unexpected activation failure for session {session_id}")]
    Unexpected {
        session_id: String,
        #[source]
        source: anyhow::Error,
    },
}

/// What actually got written. The listing always exists when this is
/// returned; photos and the audit row are best-effort.
#[derive(Debug)]
pub struct ActivationOutcome {
    pub listing: Listing,
    pub photos_written: bool,
    pub audit_logged: bool,
}

pub struct ListingActivator {
    listings: ListingsRepository,
    photos: SalonPhotosRepository,
    payment_logs: PaymentLogsRepository,
    validation_logs: ValidationLogsRepository,
}

impl ListingActivator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            listings: ListingsRepository::new(pool.clone()),
            photos: SalonPhotosRepository::new(pool.clone()),
            payment_logs: PaymentLogsRepository::new(pool.clone()),
            validation_logs: ValidationLogsRepository::new(pool),
        }
    }

    /// Persist the listing, its photos, and the payment audit row, in that
    /// order. Only the listing insert is fatal: the listing's existence is
    /// the invariant this protocol protects, photo completeness and the
    /// audit trail are reconciled by operators when they fail.
    pub async fn activate(
        &self,
        request: &ActivationRequest,
        now: DateTime<Utc>,
    ) -> Result<ActivationOutcome, ActivationError> {
        let plan = ActivationPlan::build(request, now);
        let session_id = request.session_id.clone();

        let listing = match self.listings.create(plan.new_listing).await {
            Ok(listing) => listing,
            Err(e) if is_unique_violation(&e) => {
                return Err(ActivationError::AlreadyActive(session_id));
            }
            Err(e) if e.downcast_ref::<diesel::result::Error>().is_some() => {
                return Err(ActivationError::ListingInsert {
                    session_id,
                    source: e,
                });
            }
            Err(e) => {
                return Err(ActivationError::Unexpected {
                    session_id,
                    source: e,
                });
            }
        };

        info!(
            listing_id = %listing.id,
            session_id = %session_id,
            tier = %listing.pricing_tier,
            "Activated salon listing"
        );
        metrics::counter!("salon.listings.activated").increment(1);

        let photos_written = if plan.photo_urls.is_empty() {
            true
        } else {
            let rows = NewSalonPhoto::from_urls(listing.id, &plan.photo_urls);
            match self.photos.insert_batch(rows).await {
                Ok(count) => {
                    info!(listing_id = %listing.id, count, "Inserted listing photos");
                    true
                }
                Err(e) => {
                    // Non-fatal: the listing stands without photos
                    error!(listing_id = %listing.id, error = %e, "Failed to insert listing photos");
                    metrics::counter!("salon.listings.photo_insert_failed").increment(1);
                    false
                }
            }
        };

        let new_log = NewPaymentLog {
            stripe_session_id: session_id.clone(),
            plan_type: SALON_LISTING_PLAN.to_string(),
            user_id: request.user_id.clone(),
            salon_id: listing.id,
        };
        let audit_logged = match self.payment_logs.create(new_log).await {
            // None means the unique pair already exists, which is the state
            // the audit row is there to record
            Ok(_) => true,
            Err(e) => {
                error!(listing_id = %listing.id, error = %e, "Failed to write payment log");
                metrics::counter!("salon.payment_log.insert_failed").increment(1);
                self.validation_logs
                    .record(
                        NewValidationLog::webhook(
                            listing.id.to_string(),
                            categories::PAYMENT_LOG,
                            format!("payment log insert failed: {e}"),
                        )
                        .with_context(json!({
                            "stripe_session_id": session_id,
                            "plan_type": SALON_LISTING_PLAN,
                        })),
                    )
                    .await;
                false
            }
        };

        Ok(ActivationOutcome {
            listing,
            photos_written,
            audit_logged,
        })
    }
}
