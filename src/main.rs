//! live-state-view entry point.
//!
//! Connects to `ws://{VIEW_HOST}/ws` and prints every received state to
//! stdout until interrupted.

use tracing_subscriber::EnvFilter;

use live_state_view::LiveStateDisplay;
use live_state_view::config::{LogFormat, ViewConfig};
use live_state_view::render::Renderer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ViewConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::info!(url = %config.endpoint, "starting live-state-view");

    let live = LiveStateDisplay::initialize(config.endpoint.clone());
    let mut renderer = Renderer::new(std::io::stdout(), config.pretty);

    tokio::select! {
        result = renderer.follow(live.state().subscribe()) => result?,
        _ = tokio::signal::ctrl_c() => {
            let updates = live.state().update_count();
            tracing::info!(updates, "shutting down");
        }
    }

    Ok(())
}
