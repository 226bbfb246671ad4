//! salonhub - payment-driven activation service for salon marketplace listings
//!
//! Receives Stripe checkout webhooks, verifies their signatures, and turns
//! each completed checkout session into exactly one active salon listing,
//! no matter how many times the event is delivered.

pub mod actions;
pub mod activation;
pub mod commands;
pub mod listings;
pub mod listings_repo;
pub mod metadata_resolver;
pub mod metrics;
pub mod payment_logs;
pub mod payment_logs_repo;
pub mod pending_salons;
pub mod pending_salons_repo;
pub mod salon_payload;
pub mod salon_photos;
pub mod salon_photos_repo;
pub mod schema;
pub mod settings;
pub mod stripe_client;
pub mod validation_logs;
pub mod validation_logs_repo;
pub mod web;

pub use activation::{ActivationError, ActivationOutcome, ListingActivator};
pub use metadata_resolver::{ActivationRequest, MetadataResolver, SessionMetadata};
pub use web::{AppState, PgPool};
