//! Trip chat - conversational trip planner in the terminal

use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_chat::backend::{HttpBackend, LoggingClient};
use trip_chat::config::Config;
use trip_chat::runtime::ConversationHandle;
use trip_chat::state_machine::ConvContext;

/// Startup probe only; chat requests use the configured client timeout
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // The TUI owns the terminal, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        session_id = %session_id,
        base_url = %config.backend.base_url,
        vendor_type = %config.vendor_type,
        log_path = %config.log_path.display(),
        "Starting trip chat"
    );

    let backend = HttpBackend::new(&config.backend)?;
    match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, backend.health()).await {
        Ok(Ok(health)) if health.is_online() => {
            tracing::info!(message = ?health.message, "Backend online");
        }
        Ok(Ok(health)) => {
            tracing::warn!(status = %health.status, "Backend reports unexpected status");
        }
        Ok(Err(e)) => tracing::warn!(error = %e, "Backend health check failed"),
        Err(_) => tracing::warn!("Backend health check timed out"),
    }

    let client = Arc::new(LoggingClient::new(backend));
    let context = ConvContext::new(session_id, config.vendor_type);
    let handle = ConversationHandle::spawn(context, client.clone(), client);

    trip_chat::tui::run(handle).await?;

    tracing::info!("Trip chat stopped");
    Ok(())
}
