use crate::{
    app::App,
    client::HttpWallApi,
    config::Config,
    errors::AppError,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the tracing subscriber. Logs go to stderr so they don't mix with the screen.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "photo_wall=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Builds the HTTP client and mounts the wall (first gallery fetch).
pub async fn build_app(config: &Config) -> Result<App, AppError> {
    tracing::info!(api_url = %config.api_url, "Startup: connecting to backend");
    let api = HttpWallApi::new(config.api_url.clone(), config.request_timeout)?;

    let mut app = App::new(Arc::new(api), config);
    app.mount().await;
    tracing::info!("Startup: photo wall ready.");
    Ok(app)
}
