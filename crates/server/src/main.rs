mod cli;
mod logging;
mod poller;
mod sinks;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use feedhook_ingest::HttpFeedSource;
use feedhook_rules::validation::validate_yaml;
use feedhook_rules::{ActiveConfig, ConfigLoader};
use feedhook_storage::SqliteSeenStore;

use crate::cli::Cli;
use crate::logging::LogControl;
use crate::poller::Poller;

/// Validate a config file and print the report. Errors make the result `Err`.
fn check(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let report = validate_yaml(&raw);
    for e in &report.errors {
        let location = if e.path.is_empty() { String::new() } else { format!("{}: ", e.path) };
        match &e.suggestion {
            Some(s) => println!("error: {location}{} (did you mean '{s}'?)", e.message),
            None => println!("error: {location}{}", e.message),
        }
    }
    for w in &report.warnings {
        println!("warning: {}: {}", w.path, w.message);
    }

    if !report.valid {
        anyhow::bail!("{} has {} error(s)", path.display(), report.errors.len());
    }

    let active = ActiveConfig::parse(&raw)?;
    println!(
        "{}: OK, {} rule(s), {} sink(s), {} warning(s)",
        path.display(),
        active.rules.len(),
        active.config.sinks().len(),
        report.warnings.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feedhook_core::config::load_dotenv();
    let cli = Cli::parse();

    if cli.check {
        return check(&cli.config);
    }

    let log = LogControl::init();

    let mut loader = ConfigLoader::open(cli.config.clone())
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    let active = loader.snapshot();
    log.apply(active.config.log_filter());

    let http = &active.config.http;
    let source = HttpFeedSource::new(http.rss_url.clone(), &http.user_agent())?;
    let store = SqliteSeenStore::open(active.config.database.path())
        .await
        .context("failed to open entry database")?;
    let dispatcher = sinks::build_dispatcher(&active.config.sinks())?;

    info!(
        rules = active.rules.len(),
        sinks = ?dispatcher.channel_names(),
        database = active.config.database.path(),
        "feedhook starting"
    );

    let poller = Poller::new(
        Arc::new(source),
        Arc::new(store),
        Arc::clone(&active),
        dispatcher,
        log,
    );

    if cli.once {
        if let Some(report) = poller.poll_once().await {
            futures::future::join_all(report.deliveries).await;
        }
        return Ok(());
    }

    loader.watch()?;
    poller.run(loader.subscribe()).await;
    Ok(())
}
