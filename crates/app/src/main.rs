//! Z3r0Day Talks - community platform for live security research sessions
//!
//! Headless bootstrap: loads config, opens (or seeds) the document store,
//! restores the signed-in session and prints a dashboard snapshot.

use chrono::Local;
use talks_core::{AppConfig, MeetingStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod snapshot;
mod state;

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!("Starting Z3r0Day Talks");

    // Assistant and media calls run on tokio
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    let now = Local::now().naive_local();
    let app_state = match state::AppState::new(&config, now.date()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(data_dir = %app_state.data_dir().display(), "Data directory");

    let query = app_state.dashboard_query();
    print!(
        "{}",
        snapshot::render_dashboard(app_state.meetings.meetings(), app_state.current_user(), &query)
    );

    // Signed-in viewers also get a look into the first live room
    let live = app_state
        .meetings
        .meetings()
        .iter()
        .find(|m| m.status == MeetingStatus::Live)
        .map(|m| m.id.clone());
    if let Some(mut room) = live.and_then(|id| app_state.open_room(&id)) {
        println!();
        print!("{}", snapshot::render_room(&room));
        room.leave();
    }
}
