use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use salonhub::commands;

#[derive(Parser)]
#[command(
    name = "salonhub",
    about = "Salon marketplace listing activation service",
    version = env!("VERGEN_GIT_DESCRIBE")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Run {
        /// Interface to bind to
        #[arg(long, default_value = "0.0.0.0")]
        interface: String,

        /// Port to listen on
        #[arg(long, default_value_t = 1337)]
        port: u16,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Sentry must be initialized before the tokio runtime starts so its
    // transport threads inherit the hub
    let _sentry_guard = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry::integrations::tracing::layer())
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Run { interface, port } => commands::handle_run(interface, port).await,
            Commands::Migrate => commands::handle_migrate().await,
        }
    })
}
