//! Fyre Catalog - scans plugin directories and prints the element catalog
//!
//! Reads `config.toml` from the app data directory, runs plugin discovery and
//! writes the resulting element kinds to stdout as JSON. Logs go to stderr and
//! to a daily file in the app data log directory.

use anyhow::Context;
use fyre_pipeline::{
    config::{self, EditorConfig},
    plugin::{DylibLoader, PluginRegistry},
};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    tracing::info!("Starting Fyre catalog scan");

    let config = EditorConfig::load_or_default();
    let registry = PluginRegistry::from_config(Arc::new(DylibLoader), &config);
    for path in registry.search_paths() {
        tracing::debug!("Plugin search path: {}", path.display());
    }

    let report = registry.refresh();
    for failure in &report.failures {
        tracing::warn!("{}: {}", failure.path.display(), failure.error);
    }

    let kinds = registry.list_element_kinds();
    let json =
        serde_json::to_string_pretty(&kinds).context("Failed to serialize element catalog")?;
    println!("{}", json);

    tracing::info!(
        "{} element kinds available ({} modules scanned, completed {})",
        kinds.len(),
        report.scanned,
        report.completed_at.to_rfc3339()
    );

    Ok(())
}

/// Console logging plus a daily log file when the log directory is usable.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fyre_pipeline=debug"));

    let file = config::log_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "fyre.log")));
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
