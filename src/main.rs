/// Headless runner: fetch once with the default filters and print the settled panel
use quakewatch::clients::QuakeClient;
use quakewatch::config::AppConfig;
use quakewatch::domain::QueryParams;
use quakewatch::render::{render_panel, QuakeDetail};
use quakewatch::services::QuakeSession;
use quakewatch::state::ViewState;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = AppConfig::from_env()?;
    info!(api_base = %config.api_base, "Configuration loaded successfully");

    let client = QuakeClient::from_config(&config)?;
    let mut session = QuakeSession::start(Arc::new(client), QueryParams::default());

    let state = session.settled().await;
    let view = state.view();
    print!("{}", render_panel(&view));

    match view {
        ViewState::Populated(result) => {
            if let Some(first) = result.items.first() {
                let id = first.id.clone();
                if session.select_by_id(&id) {
                    if let Some(selected) = session.selection().selected() {
                        println!();
                        print!("{}", QuakeDetail::from_quake(selected).to_text());
                    }
                }
            }
        }
        ViewState::Error(message) => warn!(%message, "quake data could not be loaded"),
        _ => {}
    }

    Ok(())
}
