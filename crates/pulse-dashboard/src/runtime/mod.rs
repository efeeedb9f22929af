//! Tokio shell around [`Session`]
//!
//! One task owns the session and processes commands strictly one at a time.
//! Effects become short-lived tasks (fetches, timers, counter frames) or
//! long-lived channel readers, all of which report back as commands. After
//! every command the current [`Document`] is published on a watch channel.

pub mod channel;
pub mod http;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use crate::connection::{ChannelAction, ChannelKind};
use crate::document::Document;
use crate::refresh::RefreshTrigger;
use crate::session::{Command, Effect, Session, SessionConfig};

pub use channel::run_channel;
pub use http::{HttpMetricsApi, MetricsApi};

/// Handle to a running dashboard session
pub struct DashboardHandle {
    session_id: Uuid,
    commands: mpsc::UnboundedSender<Command>,
    document: watch::Receiver<Document>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Queue a command; false once the session has stopped
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Sender for UI event handlers
    pub fn commands(&self) -> mpsc::UnboundedSender<Command> {
        self.commands.clone()
    }

    /// Receiver of every published document
    pub fn document(&self) -> watch::Receiver<Document> {
        self.document.clone()
    }

    /// Stop the session and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Dashboard task ended abnormally");
        }
    }
}

/// Start a session on the current tokio runtime
///
/// The session connects and runs its first refresh immediately, then
/// refreshes again every `refresh_interval`.
pub fn spawn_dashboard(
    config: SessionConfig,
    refresh_interval: Duration,
    api: Arc<dyn MetricsApi>,
) -> DashboardHandle {
    let session_id = Uuid::new_v4();
    let session = Session::new(config);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (document_tx, document_rx) = watch::channel(session.document().clone());

    let _ = commands_tx.send(Command::Start);

    let span = tracing::info_span!("dashboard", session_id = %session_id);
    let task = tokio::spawn(
        run_session(
            session,
            refresh_interval,
            api,
            commands_tx.clone(),
            commands_rx,
            document_tx,
        )
        .instrument(span),
    );

    DashboardHandle {
        session_id,
        commands: commands_tx,
        document: document_rx,
        task,
    }
}

async fn run_session(
    mut session: Session,
    refresh_interval: Duration,
    api: Arc<dyn MetricsApi>,
    commands_tx: mpsc::UnboundedSender<Command>,
    mut commands_rx: mpsc::UnboundedReceiver<Command>,
    document_tx: watch::Sender<Document>,
) {
    tracing::info!(refresh_secs = refresh_interval.as_secs_f64(), "Dashboard session started");

    let mut executor = EffectExecutor {
        commands: commands_tx,
        api,
        channels: BTreeMap::new(),
    };
    let mut ticker = interval_at(Instant::now() + refresh_interval, refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let command = tokio::select! {
            command = commands_rx.recv() => match command {
                Some(command) => command,
                None => break,
            },
            _ = ticker.tick() => Command::Refresh(RefreshTrigger::Timer),
            _ = document_tx.closed() => {
                tracing::info!("No document subscribers left");
                break;
            }
        };

        for effect in session.handle(command) {
            executor.execute(effect);
        }
        document_tx.send_replace(session.document().clone());

        if session.is_stopped() {
            break;
        }
    }

    executor.abort_channels();
    tracing::info!("Dashboard session stopped");
}

/// Turns effects into tasks
struct EffectExecutor {
    commands: mpsc::UnboundedSender<Command>,
    api: Arc<dyn MetricsApi>,
    channels: BTreeMap<ChannelKind, JoinHandle<()>>,
}

impl EffectExecutor {
    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Channel(ChannelAction::Connect {
                channel,
                url,
                epoch,
            }) => {
                self.abort_channel(channel);
                let span = tracing::info_span!("channel", %channel, epoch);
                let task = tokio::spawn(
                    run_channel(channel, url, epoch, self.commands.clone()).instrument(span),
                );
                self.channels.insert(channel, task);
            }
            Effect::Channel(ChannelAction::Disconnect { channel }) => {
                self.abort_channel(channel);
            }
            Effect::Fetch { token, filters } => {
                let api = Arc::clone(&self.api);
                let commands = self.commands.clone();
                tokio::spawn(
                    async move {
                        let result = api.fetch_metrics(&filters).await;
                        let _ = commands.send(Command::FetchCompleted { token, result });
                    }
                    .instrument(tracing::debug_span!("fetch", %token)),
                );
            }
            Effect::Animate {
                target,
                generation,
                animation,
            } => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let interval = animation.interval();
                    for step in 1..=animation.steps {
                        sleep(interval).await;
                        let frame = Command::CounterFrame {
                            target,
                            generation,
                            value: animation.frame(step),
                        };
                        if commands.send(frame).is_err() {
                            return;
                        }
                    }
                });
            }
            Effect::Schedule { after, command } => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    sleep(after).await;
                    let _ = commands.send(*command);
                });
            }
        }
    }

    fn abort_channel(&mut self, channel: ChannelKind) {
        if let Some(task) = self.channels.remove(&channel) {
            task.abort();
        }
    }

    fn abort_channels(&mut self) {
        for (_, task) in std::mem::take(&mut self.channels) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::RetryPolicy;
    use crate::document::ElementId;
    use crate::render::CounterSettings;
    use async_trait::async_trait;
    use pulse_core::{FetchError, FilterState, MetricsSnapshot};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    struct FixedApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetricsApi for FixedApi {
        async fn fetch_metrics(&self, _filters: &FilterState) -> Result<MetricsSnapshot, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let json = format!(
                r#"{{"total_metrics": {{"total_contracts": 42}}, "collaborator_metrics": {{}}, "timestamp": "call-{}"}}"#,
                call
            );
            serde_json::from_str(&json).map_err(|e| FetchError::Decode(e.to_string()))
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            // Nothing listens here; channels keep failing and retrying
            ws_base: Url::parse("ws://127.0.0.1:9").unwrap(),
            retry: RetryPolicy::fixed(Duration::from_millis(200)),
            banner_ttl: Duration::from_secs(5),
            counter: CounterSettings {
                duration: Duration::from_millis(50),
                steps: 5,
            },
        }
    }

    #[tokio::test]
    async fn test_startup_fetch_animates_counters() {
        let api = Arc::new(FixedApi {
            calls: AtomicUsize::new(0),
        });
        let handle = spawn_dashboard(config(), Duration::from_secs(3600), api);
        let mut document = handle.document();

        let reached = tokio::time::timeout(
            Duration::from_secs(5),
            document.wait_for(|d| d.text(ElementId::TotalContracts) == Some("42")),
        )
        .await
        .map(|r| r.is_ok())
        .unwrap_or(false);
        assert!(reached, "counter never reached 42");
        assert_eq!(document.borrow().text(ElementId::LastUpdate), Some("call-1"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_timer_triggers_refresh() {
        let api = Arc::new(FixedApi {
            calls: AtomicUsize::new(0),
        });
        let handle = spawn_dashboard(config(), Duration::from_millis(50), api.clone());
        let mut document = handle.document();

        let reached = tokio::time::timeout(
            Duration::from_secs(5),
            document.wait_for(|d| {
                d.text(ElementId::LastUpdate)
                    .and_then(|t| t.strip_prefix("call-"))
                    .and_then(|n| n.parse::<usize>().ok())
                    .is_some_and(|n| n >= 3)
            }),
        )
        .await
        .map(|r| r.is_ok())
        .unwrap_or(false);
        assert!(reached, "timer refreshes did not arrive");
        assert!(api.calls.load(Ordering::SeqCst) >= 3);

        handle.shutdown().await;
    }
}
