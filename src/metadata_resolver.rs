use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::pending_salons_repo::PendingSalonsRepository;
use crate::salon_payload::SalonPayload;

/// The metadata keys this service recognizes on a checkout session.
///
/// The checkout flow attaches these when it creates the session; everything
/// is a string on the wire, so extraction is centralized here instead of
/// reading untyped keys throughout the handler.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    pub user_id: Option<String>,
    pub pricing_tier: Option<String>,
    pub featured_addon: bool,
    pub form_data: Option<String>,
    pub pending_salon_id: Option<String>,
    pub salon_name: Option<String>,
}

impl SessionMetadata {
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| map.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            user_id: non_empty("user_id"),
            pricing_tier: non_empty("pricing_tier"),
            featured_addon: map.get("featured_addon").is_some_and(|v| v == "true"),
            form_data: non_empty("form_data"),
            pending_salon_id: non_empty("pending_salon_id"),
            salon_name: non_empty("salon_name"),
        }
    }
}

/// Where the resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    FormData,
    PendingSalon,
    Empty,
}

/// Outcome of payload resolution. Resolution never fails outright: a parse
/// error or a fallback miss degrades to an empty payload with the reason
/// attached, and the required-field validation decides whether the event can
/// still proceed. A paid event is only dropped for missing identity data,
/// never for a malformed draft.
#[derive(Debug, Clone)]
pub struct ResolvedPayload {
    pub payload: SalonPayload,
    pub source: PayloadSource,
    pub degraded: Option<String>,
}

impl ResolvedPayload {
    fn empty(reason: impl Into<String>) -> Self {
        Self {
            payload: SalonPayload::default(),
            source: PayloadSource::Empty,
            degraded: Some(reason.into()),
        }
    }
}

/// Fast path: parse the form_data metadata entry as a JSON payload.
pub fn parse_form_data(raw: &str) -> ResolvedPayload {
    match serde_json::from_str::<SalonPayload>(raw) {
        Ok(payload) => ResolvedPayload {
            payload,
            source: PayloadSource::FormData,
            degraded: None,
        },
        Err(e) => {
            warn!(error = %e, "Failed to parse form_data metadata, continuing with empty payload");
            ResolvedPayload::empty(format!("form_data parse error: {e}"))
        }
    }
}

#[derive(Clone)]
pub struct MetadataResolver {
    pending_salons: PendingSalonsRepository,
    /// Whether the pending-submission fallback path is enabled. Injected at
    /// construction time so both behaviors are testable deterministically.
    pending_fallback_enabled: bool,
}

impl MetadataResolver {
    pub fn new(pending_salons: PendingSalonsRepository, pending_fallback_enabled: bool) -> Self {
        Self {
            pending_salons,
            pending_fallback_enabled,
        }
    }

    /// Produce a listing payload from the session metadata.
    ///
    /// form_data wins when present, even if it fails to parse; the pending
    /// row is only consulted when form_data is absent entirely.
    pub async fn resolve(&self, meta: &SessionMetadata) -> ResolvedPayload {
        if let Some(raw) = &meta.form_data {
            return parse_form_data(raw);
        }

        if !self.pending_fallback_enabled {
            return ResolvedPayload::empty("no form_data and pending fallback is disabled");
        }

        let Some(pending_id) = &meta.pending_salon_id else {
            return ResolvedPayload::empty("no form_data and no pending_salon_id");
        };

        let pending_id = match Uuid::parse_str(pending_id) {
            Ok(id) => id,
            Err(_) => {
                warn!(pending_salon_id = %pending_id, "pending_salon_id is not a valid UUID");
                return ResolvedPayload::empty(format!(
                    "pending_salon_id {pending_id:?} is not a valid UUID"
                ));
            }
        };

        match self.pending_salons.get_by_id(pending_id).await {
            Ok(Some(row)) => ResolvedPayload {
                payload: row.into(),
                source: PayloadSource::PendingSalon,
                degraded: None,
            },
            Ok(None) => {
                warn!(pending_salon_id = %pending_id, "No pending salon row for fallback");
                ResolvedPayload::empty(format!("no pending salon row {pending_id}"))
            }
            Err(e) => {
                warn!(pending_salon_id = %pending_id, error = %e, "Pending salon fetch failed");
                ResolvedPayload::empty(format!("pending salon fetch failed: {e}"))
            }
        }
    }
}

/// A fully validated activation request: everything the activator needs,
/// with the identity fields guaranteed present.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    pub session_id: String,
    pub user_id: String,
    pub pricing_tier: String,
    pub featured: bool,
    pub salon_name: String,
    pub payload: SalonPayload,
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("missing required metadata: {}", missing.join(", "))]
    MissingMetadata {
        missing: Vec<&'static str>,
        /// Why resolution came up empty, when it did.
        degraded: Option<String>,
    },
}

/// The single required-field check: user id, pricing tier, and a resolvable
/// salon name must all be present before any listing is created. The
/// salon_name metadata key is the secondary fallback for the name.
pub fn validate(
    session_id: &str,
    meta: &SessionMetadata,
    resolved: ResolvedPayload,
) -> Result<ActivationRequest, ResolutionError> {
    let salon_name = resolved
        .payload
        .salon_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            meta.salon_name
                .clone()
                .filter(|name| !name.trim().is_empty())
        });

    let mut missing = Vec::new();
    if meta.user_id.is_none() {
        missing.push("user_id");
    }
    if meta.pricing_tier.is_none() {
        missing.push("pricing_tier");
    }
    if salon_name.is_none() {
        missing.push("salon_name");
    }

    if !missing.is_empty() {
        return Err(ResolutionError::MissingMetadata {
            missing,
            degraded: resolved.degraded,
        });
    }

    // The unwraps cannot fire: every None was pushed to `missing` above.
    Ok(ActivationRequest {
        session_id: session_id.to_string(),
        user_id: meta.user_id.clone().unwrap_or_default(),
        pricing_tier: meta.pricing_tier.clone().unwrap_or_default(),
        featured: meta.featured_addon,
        salon_name: salon_name.unwrap_or_default(),
        payload: resolved.payload,
    })
}
