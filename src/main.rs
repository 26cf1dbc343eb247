//! csnotify - watch cloud storage objects for changes
//!
//! Entry point for the csnotify command-line watcher.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use csnotify::telemetry::{init_metrics, init_tracing, render_metrics};
use csnotify::{Config, Result, S3Source, WatchStreams, Watcher};

/// csnotify - watch cloud storage objects for changes
#[derive(Parser, Debug)]
#[command(name = "csnotify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Object paths to watch, e.g. s3://bucket/key
    #[arg(required = true, env = "CSNOTIFY_PATHS", value_delimiter = ',')]
    paths: Vec<String>,

    /// Seconds between poll cycles
    #[arg(short, long, env = "CSNOTIFY_INTERVAL", default_value = "5")]
    interval: u64,

    /// Per-fetch timeout in seconds (0 disables)
    #[arg(long, env = "CSNOTIFY_FETCH_TIMEOUT", default_value = "30")]
    fetch_timeout: u64,

    /// Events buffered before polling waits
    #[arg(long, env = "CSNOTIFY_EVENT_BUFFER", default_value = "1")]
    event_buffer: usize,

    /// Errors buffered before polling waits
    #[arg(long, env = "CSNOTIFY_ERROR_BUFFER", default_value = "1")]
    error_buffer: usize,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom S3 endpoint
    #[arg(long, env = "CSNOTIFY_ENDPOINT")]
    endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CSNOTIFY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "CSNOTIFY_LOG_JSON")]
    log_json: bool,

    /// Print Prometheus metrics to stdout on shutdown
    #[arg(long, env = "CSNOTIFY_METRICS")]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    tracing::info!("csnotify v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config {
        poll_interval_secs: cli.interval,
        event_buffer: cli.event_buffer,
        error_buffer: cli.error_buffer,
        fetch_timeout_secs: cli.fetch_timeout,
        region: cli.region,
        endpoint: cli.endpoint,
        log_level: cli.log_level,
        log_json: cli.log_json,
        paths: cli.paths,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    init_metrics();

    let source = Arc::new(S3Source::new(config.s3_options()));
    let (watcher, streams) = Watcher::new(source, &config.watcher_config())?;
    for path in &config.paths {
        watcher.add(path)?;
    }

    report(streams).await;

    watcher.close().await?;

    if cli.metrics {
        let text = render_metrics()?;
        std::io::stdout().lock().write_all(text.as_bytes())?;
    }

    tracing::info!("csnotify stopped");
    Ok(())
}

/// Log events and errors until Ctrl-C.
async fn report(mut streams: WatchStreams) {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                return;
            }
            Some(event) = streams.events.recv() => {
                println!("{}", event.path);
            }
            Some(failure) = streams.errors.recv() => {
                tracing::error!(path = %failure.path, error = %failure.error, "Fetch failed");
            }
        }
    }
}
