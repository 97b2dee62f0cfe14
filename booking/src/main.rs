//! seatmap: answers booking commands read from stdin.
//!
//! Replies go to stdout, one line per command; logs go to stderr.

use booking::{BookingApp, Config};
use seatmap_core::environment::SystemClock;
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(?config, "Starting seatmap session");

    let app = BookingApp::new(&config.session, Arc::new(SystemClock));
    let answered = app.run(BufReader::new(io::stdin()), io::stdout()).await?;
    app.shutdown();

    info!(answered, "Seatmap session complete");
    Ok(())
}
