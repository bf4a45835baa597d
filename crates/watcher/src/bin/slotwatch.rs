//! slotwatch: polls vaccine slot availability and posts new openings.
//!
//! Each tick queries the availability API for today's date, drops sessions
//! whose (center, age band, date) topic was announced within the last ten
//! minutes, and sends one message per remaining session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::Notify;
use tracing::info;

use slotwatch_core::config::{load_dotenv, load_env_file};
use slotwatch_core::{Config, SystemClock};
use slotwatch_fetch::HttpFetcher;
use slotwatch_notify::{Dispatcher, MessageRenderer, Notifier, StdoutNotifier, TelegramNotifier};
use slotwatch_watcher::{CronTicker, Watcher};

// ── CLI ─────────────────────────────────────────────────────────────

/// Vaccine slot watcher: polls availability and notifies a Telegram channel.
#[derive(Parser, Debug)]
#[command(name = "slotwatch", version, about)]
struct Cli {
    /// Env file to load instead of `./.env`.
    #[arg(long, env = "SLOTWATCH_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Run a single tick, wait for its notifications, and exit.
    #[arg(long)]
    once: bool,

    /// Print messages to stdout instead of sending them.
    #[arg(long)]
    dry_run: bool,

    /// Send one test message through the configured channel and exit.
    #[arg(long)]
    test_notify: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.env_file {
        Some(ref path) => {
            load_env_file(path)?;
            info!(path = %path.display(), "loaded env file");
        }
        None => load_dotenv(),
    }

    let config = Config::from_env().context("failed to load configuration")?;
    config.log_summary();

    let template = config
        .message
        .resolve_template()
        .context("failed to read message template")?;
    let renderer = MessageRenderer::from_option(template).context("invalid message template")?;

    let channel: Box<dyn Notifier> = if cli.dry_run {
        info!("dry run: messages will be printed, not sent");
        Box::new(StdoutNotifier::new(config.telegram.channel_id.clone()))
    } else {
        Box::new(
            TelegramNotifier::from_config(
                config.telegram.bot_api.clone(),
                config.telegram.channel_id.clone(),
            )
            .context("invalid Telegram configuration")?,
        )
    };
    let dispatcher = Arc::new(Dispatcher::new(channel, renderer));

    if cli.test_notify {
        dispatcher
            .test_notify()
            .await
            .context("test notification failed")?;
        info!(channel = dispatcher.channel_name(), "test notification sent");
        return Ok(());
    }

    let fetcher = Arc::new(
        HttpFetcher::new(config.availability.endpoint.clone())
            .context("failed to build availability client")?,
    );

    let ticker = CronTicker::parse(&config.schedule.cron)?;

    let mut watcher = Watcher::new(
        config.availability.district_id.clone(),
        fetcher,
        dispatcher,
        Arc::new(SystemClock::new()),
    )
    .with_pruning(config.schedule.prune_state);

    if cli.once {
        let report = watcher.run_tick().await;
        info!(?report, "single tick complete");
        watcher.drain().await;
        return Ok(());
    }

    let shutdown = Arc::new(Notify::new());
    let shutdown_on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl-C");
            // `notify_one` stores a permit, so a signal that lands mid-tick
            // is still seen on the next wait.
            shutdown_on_signal.notify_one();
        }
    });

    watcher.run(&ticker, shutdown).await;
    info!("slotwatch exited cleanly");

    Ok(())
}
