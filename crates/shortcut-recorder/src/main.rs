//! Shortcut-Recorder: record keyboard shortcut chords into a binding store.

mod app;
mod atomic_write;
mod cli;
mod config;
mod error;
mod stdin_capture;
#[cfg(test)]
mod tests;
mod toml_store;
mod user_notifier;

pub(crate) use {
    app::App,
    cli::{Cli, Command},
    error::{AppError, Result as AppResult},
    stdin_capture::StdinCaptureService,
    toml_store::TomlBindingStore,
    user_notifier::UserNotifier,
};

use crate::config::Config;

use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to open bindings: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(app.run(cli.command));

    // The stdin forwarder may still be blocked in read_line; don't wait on it.
    rt.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
