use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::time::Instant;
use uuid::Uuid;

use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::actions;
use crate::settings::Settings;
use crate::stripe_client::StripeConfig;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub stripe_config: Option<StripeConfig>,
    pub settings: Settings,
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

// Middleware to capture HTTP errors to Sentry
async fn sentry_error_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    // Capture HTTP 5xx errors to Sentry
    if response.status().is_server_error() {
        let status = response.status();
        error!("HTTP {} error on {} {}", status.as_u16(), method, uri);

        sentry::configure_scope(|scope| {
            scope.set_tag("http.method", method.as_str());
            scope.set_tag("http.url", uri.to_string());
            scope.set_tag("http.status_code", status.as_u16().to_string());
        });

        sentry::capture_message(
            &format!("HTTP {} error on {} {}", status.as_u16(), method, uri),
            sentry::Level::Error,
        );
    }

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

pub async fn start_web_server(interface: String, port: u16, app_state: AppState) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "web-server");
    });
    info!("Starting web server on {}:{}", interface, port);

    actions::init_server_start_time();

    // Permissive CORS also answers OPTIONS preflights from checkout pages
    let cors_layer = CorsLayer::permissive();

    let app = Router::new()
        .route(
            "/webhooks/salon-posting",
            post(actions::handle_salon_posting_webhook),
        )
        .route("/status", get(actions::get_status))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .with_state(app_state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(sentry_error_middleware))
        .layer(cors_layer);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", interface, port)).await?;
    info!("Web server listening on http://{}:{}", interface, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
