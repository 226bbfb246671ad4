//! POST /webhooks/salon-posting
//!
//! Turns one Stripe `checkout.session.completed` event into exactly one
//! activated salon listing. Duplicate deliveries are acknowledged without
//! side effects; the only retryable failure is the listing insert itself,
//! where Stripe's own redelivery is the retry mechanism.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use stripe::{EventObject, Webhook};
use tracing::{error, info, warn};

use crate::activation::{ActivationError, ListingActivator};
use crate::metadata_resolver::{MetadataResolver, ResolutionError, SessionMetadata, validate};
use crate::payment_logs::SALON_LISTING_PLAN;
use crate::payment_logs_repo::PaymentLogsRepository;
use crate::pending_salons_repo::PendingSalonsRepository;
use crate::validation_logs::{NewValidationLog, categories};
use crate::validation_logs_repo::ValidationLogsRepository;
use crate::web::AppState;

use super::{json_error, received_ack};

/// The only event type that activates a listing; everything else is
/// acknowledged with no side effects.
const ACTIVATION_EVENT: &str = "checkout.session.completed";

pub async fn handle_salon_posting_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(stripe_config) = &state.stripe_config else {
        return json_error(StatusCode::SERVICE_UNAVAILABLE, "Stripe is not configured")
            .into_response();
    };

    metrics::counter!("stripe.webhook.received").increment(1);
    let start = std::time::Instant::now();

    // Signature verification happens on the raw bytes, before the body is
    // parsed as an event at all
    let signature = match headers.get("Stripe-Signature").and_then(|sig| sig.to_str().ok()) {
        Some(s) => s.to_string(),
        None => {
            metrics::counter!("stripe.webhook.signature_invalid").increment(1);
            return json_error(StatusCode::BAD_REQUEST, "Invalid signature").into_response();
        }
    };

    let payload = match std::str::from_utf8(&body) {
        Ok(s) => s,
        Err(_) => {
            metrics::counter!("stripe.webhook.signature_invalid").increment(1);
            return json_error(StatusCode::BAD_REQUEST, "Invalid signature").into_response();
        }
    };

    let event = match Webhook::construct_event(payload, &signature, &stripe_config.webhook_secret) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Invalid webhook signature");
            metrics::counter!("stripe.webhook.signature_invalid").increment(1);
            return json_error(StatusCode::BAD_REQUEST, "Invalid signature").into_response();
        }
    };

    let event_type = event.type_.to_string();
    if event_type != ACTIVATION_EVENT {
        info!(event_type = %event_type, "Ignoring non-activation event type");
        return received_ack().into_response();
    }

    let EventObject::CheckoutSession(session) = &event.data.object else {
        warn!(event_id = %event.id, "checkout.session.completed without a session object");
        return received_ack().into_response();
    };

    let session_id = session.id.to_string();
    let meta_map = session.metadata.clone().unwrap_or_default();
    let meta = SessionMetadata::from_map(&meta_map);

    let payment_logs = PaymentLogsRepository::new(state.pool.clone());
    let validation_logs = ValidationLogsRepository::new(state.pool.clone());

    // Idempotency guard: Stripe may deliver the same event more than once.
    // This runs before any listing-creation side effect; the unique indexes
    // below it close the remaining check-then-act window.
    match payment_logs.exists(&session_id, SALON_LISTING_PLAN).await {
        Ok(true) => {
            info!(session_id = %session_id, "Session already processed, acknowledging replay");
            metrics::counter!("stripe.webhook.duplicate").increment(1);
            return received_ack().into_response();
        }
        Ok(false) => {}
        Err(e) => {
            // The unique constraints still prevent double-creation if this
            // read failed transiently
            error!(session_id = %session_id, error = %e, "Idempotency check failed, continuing");
        }
    }

    let resolver = MetadataResolver::new(
        PendingSalonsRepository::new(state.pool.clone()),
        state.settings.pending_fallback_enabled,
    );
    let resolved = resolver.resolve(&meta).await;

    let request = match validate(&session_id, &meta, resolved) {
        Ok(request) => request,
        Err(ResolutionError::MissingMetadata { missing, degraded }) => {
            warn!(
                session_id = %session_id,
                missing = ?missing,
                degraded = ?degraded,
                "Rejecting session with incomplete metadata"
            );
            metrics::counter!("salon.webhook.metadata_rejected").increment(1);
            validation_logs
                .record(
                    NewValidationLog::webhook(
                        session_id.clone(),
                        categories::METADATA,
                        format!("missing required metadata: {}", missing.join(", ")),
                    )
                    .with_context(json!({
                        "missing": missing,
                        "degraded": degraded,
                    })),
                )
                .await;
            return json_error(StatusCode::BAD_REQUEST, "Missing required metadata")
                .into_response();
        }
    };

    let activator = ListingActivator::new(state.pool.clone());
    let response = match activator.activate(&request, Utc::now()).await {
        Ok(outcome) => {
            info!(
                listing_id = %outcome.listing.id,
                session_id = %session_id,
                photos_written = outcome.photos_written,
                audit_logged = outcome.audit_logged,
                "Webhook processed"
            );
            received_ack().into_response()
        }
        Err(ActivationError::AlreadyActive(_)) => {
            // Concurrent redelivery lost the insert race; the listing exists
            info!(session_id = %session_id, "Listing already active, acknowledging replay");
            metrics::counter!("stripe.webhook.duplicate").increment(1);
            received_ack().into_response()
        }
        Err(ActivationError::ListingInsert { source, .. }) => {
            error!(session_id = %session_id, error = %source, "Listing insert failed");
            metrics::counter!("salon.listings.insert_failed").increment(1);
            validation_logs
                .record(
                    NewValidationLog::webhook(
                        session_id.clone(),
                        categories::CREATION,
                        format!("listing insert failed: {source}"),
                    )
                    .with_context(json!({ "user_id": request.user_id })),
                )
                .await;
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create salon listing",
            )
            .into_response()
        }
        Err(ActivationError::Unexpected { source, .. }) => {
            error!(session_id = %session_id, error = %source, "Unexpected activation failure");
            validation_logs
                .record(NewValidationLog::webhook(
                    session_id.clone(),
                    categories::CREATION,
                    format!("unexpected activation failure: {source}"),
                ))
                .await;
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error in salon creation",
            )
            .into_response()
        }
    };

    let duration_ms = start.elapsed().as_millis() as f64;
    metrics::histogram!("stripe.webhook.processing_ms").record(duration_ms);

    response
}
