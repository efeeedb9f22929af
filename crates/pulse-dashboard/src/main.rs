//! Contract Pulse - desktop entry point
//!
//! Usage:
//!   contract-pulse --base-url http://metrics.local:8000
//!   contract-pulse --config pulse.toml --headless
//!   contract-pulse --headless --log-dir /var/log/contract-pulse

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dioxus::prelude::*;
use tokio::sync::mpsc;

use pulse_dashboard::components::Dashboard;
use pulse_dashboard::{
    spawn_dashboard, Command, DashboardConfig, Document, ElementId, HttpMetricsApi, MetricsApi,
    SessionConfig,
};
use pulse_logging::{FileConfig, PulseSubscriberBuilder};

const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Everything the UI needs to start its session
struct Launch {
    session: SessionConfig,
    refresh_interval: Duration,
    api: Arc<dyn MetricsApi>,
}

static LAUNCH: OnceLock<Launch> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "contract-pulse")]
#[command(about = "Live contract-processing metrics dashboard")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend address, overrides the configuration file
    #[arg(long)]
    base_url: Option<String>,

    /// Default log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Human-readable console logs instead of JSONL
    #[arg(long)]
    pretty: bool,

    /// Also write JSONL log files to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Run the session without a window and log what it renders
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let mut logging = PulseSubscriberBuilder::new().with_config(config.log.clone());
    if let Some(level) = args.log_level {
        logging = logging.with_level(level);
    }
    if args.pretty {
        logging = logging.with_pretty_console(true);
    }
    if let Some(dir) = args.log_dir {
        logging = logging.with_file_output(FileConfig::new(dir));
    }
    let _log_guard = logging.init();

    let launch = Launch {
        session: config.session_config()?,
        refresh_interval: config.refresh_interval(),
        api: Arc::new(
            HttpMetricsApi::new(config.metrics_endpoint()?, config.request_timeout())
                .context("building HTTP client")?,
        ),
    };
    tracing::info!(base_url = %config.base_url, headless = args.headless, "Starting Contract Pulse");

    if args.headless {
        return run_headless(launch);
    }

    if LAUNCH.set(launch).is_err() {
        anyhow::bail!("launch settings already initialized");
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title("Contract Pulse")
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1400, 900))
                        .with_resizable(true),
                )
                .with_custom_head(format!(r#"<style>{}</style>"#, STYLE_CSS)),
        )
        .launch(RootApp);

    Ok(())
}

/// Session without a window, until ctrl-c
fn run_headless(launch: Launch) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let handle = spawn_dashboard(launch.session, launch.refresh_interval, launch.api);
        let mut updates = handle.document();
        let mut last_seen = String::new();

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let document = updates.borrow_and_update().clone();
                    let last_update = document.text(ElementId::LastUpdate).unwrap_or("");
                    if last_update != last_seen {
                        last_seen = last_update.to_string();
                        tracing::info!(
                            last_update,
                            total = document.text(ElementId::TotalContracts).unwrap_or(""),
                            loading = document.is_loading(),
                            "Dashboard updated"
                        );
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    break;
                }
            }
        }

        handle.shutdown().await;
    });
    Ok(())
}

/// Root application component
fn RootApp() -> Element {
    let mut document = use_signal(Document::standard);
    let mut commands = use_signal(|| None::<mpsc::UnboundedSender<Command>>);

    use_drop(move || {
        if let Some(tx) = commands.peek().as_ref() {
            let _ = tx.send(Command::Shutdown);
        }
    });

    use_future(move || async move {
        let Some(launch) = LAUNCH.get() else {
            tracing::error!("Launch settings missing");
            return;
        };
        let handle = spawn_dashboard(
            launch.session.clone(),
            launch.refresh_interval,
            Arc::clone(&launch.api),
        );
        commands.set(Some(handle.commands()));

        let mut updates = handle.document();
        while updates.changed().await.is_ok() {
            let latest = updates.borrow_and_update().clone();
            document.set(latest);
        }
        tracing::info!(session_id = %handle.session_id(), "Dashboard session ended");
    });

    rsx! {
        Dashboard {
            document: document(),
            on_command: move |command: Command| {
                match commands.read().as_ref() {
                    Some(tx) => {
                        let _ = tx.send(command);
                    }
                    None => tracing::debug!(?command, "Session not started yet, dropping command"),
                }
            },
        }
    }
}
