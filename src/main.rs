use std::error::Error;

use ai_webhook_service::telemetry;
use tracing::{Level, warn};
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine (variables may come from the environment); a broken one is not.
    let dotenv = match dotenvy::dotenv() {
        Ok(_) => None,
        Err(e) if e.not_found() => Some("no .env file found, using process environment"),
        Err(e) => return Err(e.into()),
    };

    let filter = telemetry::env_filter_with_levels(
        "info",
        &[
            ("audit_evidence", Level::DEBUG),
            (telemetry::TARGET_PREFIX, Level::INFO),
        ],
    );

    // The webhook crate renders its own events through `telemetry::layer()`.
    let not_webhook =
        filter::filter_fn(|meta| !meta.target().starts_with(telemetry::TARGET_PREFIX));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_filter(not_webhook))
        .with(telemetry::layer())
        .try_init()?;

    if let Some(msg) = dotenv {
        warn!("{msg}");
    }

    api::start().await?;

    Ok(())
}
