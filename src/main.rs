use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::intake::IntakeFlow;
use crate::location::IpLocationProvider;
use crate::store::FileStore;

mod app;
mod catalog;
mod cli;
mod command;
mod config;
mod intake;
mod location;
mod request;
mod screen;
mod search;
mod store;
mod theme;
mod tui;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting zerowait");

    let args = cli::Args::parse();

    let config = config::load()?;
    let keybindings = Arc::new(config.keybindings.clone());
    let resolver = Arc::new(KeyResolver::new(keybindings));
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme.name);
    let theme = theme::theme_from_name(theme_name);

    let store = Arc::new(FileStore::open_default()?);
    let provider = Arc::new(IpLocationProvider::new(&config.location));
    let flow = IntakeFlow::new(store, provider, config.location.fix_request());

    let mut app = App::new(flow, resolver, theme);
    if let Some(service) = &args.service {
        app.preselect_service(service)?;
    }
    app.run().await?;

    Ok(())
}

/// File logging only; stdout belongs to the TUI. `RUST_LOG` filters as
/// usual, and the returned guard must outlive the app so the writer flushes.
fn initialize_logging() -> Result<WorkerGuard> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_default()
        .join("zerowait")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "zerowait.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(file_layer)
        .init();

    Ok(guard)
}
