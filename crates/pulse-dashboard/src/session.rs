//! Dashboard session
//!
//! [`Session`] owns every piece of mutable dashboard state and advances it
//! one [`Command`] at a time. It performs no I/O: each command yields the
//! [`Effect`]s the runtime has to carry out, whose results come back as
//! further commands.

use std::collections::BTreeMap;
use std::time::Duration;

use pulse_core::{
    fill_missing_groups, AlertBatch, ChannelFrame, FetchError, MetricsSnapshot, PulseError,
};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::connection::{ChannelAction, ChannelKind, ConnectionManager, RetryPolicy};
use crate::document::{Banner, Document, ElementId, Instruction, RenderSink};
use crate::filters::{refresh_filter_options, FilterControl};
use crate::health::{check_health, HealthReport};
use crate::refresh::{
    container_loading, refresh_loading, RefreshOrchestrator, RefreshTrigger, RequestToken,
    REFRESH_ERROR_MESSAGE,
};
use crate::render::{
    render_alerts, render_collaborator_table, render_snapshot, CounterAnimation, CounterSettings,
    GroupCache,
};

/// Shown when a snapshot cannot be rendered
pub const RENDER_ERROR_MESSAGE: &str =
    "Erro ao atualizar dados. Verifique o console para mais detalhes.";

/// Banner text for a failure
fn banner_message(error: &PulseError) -> &'static str {
    match error {
        PulseError::Snapshot(_) => RENDER_ERROR_MESSAGE,
        PulseError::Fetch(_) | PulseError::Channel(_) => REFRESH_ERROR_MESSAGE,
    }
}

/// Settings the session needs at runtime
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Backend base address with the `ws`/`wss` scheme
    pub ws_base: Url,
    pub retry: RetryPolicy,
    /// How long an error banner stays up
    pub banner_ttl: Duration,
    pub counter: CounterSettings,
}

/// Input to the session
#[derive(Debug)]
pub enum Command {
    /// Open both channels and run the first refresh
    Start,
    ChannelOpened {
        channel: ChannelKind,
        epoch: u64,
    },
    ChannelMessage {
        channel: ChannelKind,
        epoch: u64,
        text: String,
    },
    /// Closed or failed; both count as a close
    ChannelClosed {
        channel: ChannelKind,
        epoch: u64,
        reason: String,
    },
    ReconnectDue,
    Refresh(RefreshTrigger),
    FetchCompleted {
        token: RequestToken,
        result: Result<MetricsSnapshot, FetchError>,
    },
    FilterChanged {
        control: FilterControl,
        value: String,
    },
    CounterFrame {
        target: ElementId,
        generation: u64,
        value: i64,
    },
    DismissBanner {
        target: ElementId,
        id: u64,
    },
    CheckHealth,
    Shutdown,
}

/// Work the runtime performs on the session's behalf
#[derive(Debug)]
pub enum Effect {
    Channel(ChannelAction),
    Fetch {
        token: RequestToken,
        filters: pulse_core::FilterState,
    },
    /// Play a counter animation, reporting each frame as a
    /// [`Command::CounterFrame`] tagged with `generation`
    Animate {
        target: ElementId,
        generation: u64,
        animation: CounterAnimation,
    },
    /// Feed `command` back after `after`
    Schedule { after: Duration, command: Box<Command> },
}

pub struct Session {
    config: SessionConfig,
    document: Document,
    cache: GroupCache,
    connections: ConnectionManager,
    refresh: RefreshOrchestrator,
    /// Newest animation per counter; older frames are dropped
    counter_generations: BTreeMap<ElementId, u64>,
    next_banner: u64,
    last_health: Option<HealthReport>,
    stopped: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_document(config, Document::standard())
    }

    /// Start from an arbitrary document, e.g. one missing some elements
    pub fn with_document(config: SessionConfig, document: Document) -> Self {
        let connections = ConnectionManager::new(config.ws_base.clone(), config.retry);
        Self {
            config,
            document,
            cache: GroupCache::default(),
            connections,
            refresh: RefreshOrchestrator::new(),
            counter_generations: BTreeMap::new(),
            next_banner: 0,
            last_health: None,
            stopped: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn group_cache(&self) -> &GroupCache {
        &self.cache
    }

    pub fn last_health(&self) -> Option<HealthReport> {
        self.last_health
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Advance the session by one command
    pub fn handle(&mut self, command: Command) -> Vec<Effect> {
        if self.stopped {
            debug!(?command, "Session stopped, dropping command");
            return Vec::new();
        }

        match command {
            Command::Start => {
                let mut effects = self.connect_all();
                effects.extend(self.begin_refresh(RefreshTrigger::Startup));
                effects
            }
            Command::ChannelOpened { channel, epoch } => {
                if self.connections.on_open(channel, epoch) && channel == ChannelKind::Metrics {
                    self.document.apply(container_loading(false));
                }
                Vec::new()
            }
            Command::ChannelMessage {
                channel,
                epoch,
                text,
            } => {
                if !self.connections.accepts(channel, epoch) {
                    debug!(%channel, epoch, "Dropping message from stale channel");
                    return Vec::new();
                }
                match channel {
                    ChannelKind::Metrics => self.on_metrics_frame(&text),
                    ChannelKind::Alerts => {
                        self.on_alerts_frame(&text);
                        Vec::new()
                    }
                }
            }
            Command::ChannelClosed {
                channel,
                epoch,
                reason,
            } => {
                if self.connections.accepts(channel, epoch) {
                    info!(%channel, epoch, %reason, "Channel closed");
                    if channel == ChannelKind::Metrics {
                        self.document.apply(container_loading(true));
                    }
                }
                match self.connections.on_closed(channel, epoch) {
                    Some(after) => vec![Effect::Schedule {
                        after,
                        command: Box::new(Command::ReconnectDue),
                    }],
                    None => Vec::new(),
                }
            }
            Command::ReconnectDue => self.connect_all(),
            Command::Refresh(trigger) => self.begin_refresh(trigger),
            Command::FetchCompleted { token, result } => self.complete_refresh(token, result),
            Command::FilterChanged { control, value } => {
                self.document.apply(Instruction::SetValue {
                    target: control.element(),
                    value,
                });
                if control == FilterControl::Group {
                    let instructions = refresh_filter_options(&self.document, &self.cache);
                    self.document.apply_all(instructions);
                }
                self.begin_refresh(RefreshTrigger::FilterChanged)
            }
            Command::CounterFrame {
                target,
                generation,
                value,
            } => {
                if self.counter_generations.get(&target) == Some(&generation) {
                    self.document.apply(Instruction::SetText {
                        target,
                        text: value.to_string(),
                    });
                }
                Vec::new()
            }
            Command::DismissBanner { target, id } => {
                self.document.apply(Instruction::DismissBanner { target, id });
                Vec::new()
            }
            Command::CheckHealth => {
                self.run_health_check();
                Vec::new()
            }
            Command::Shutdown => {
                info!("Shutting down dashboard session");
                self.stopped = true;
                self.connections
                    .shutdown()
                    .into_iter()
                    .map(Effect::Channel)
                    .collect()
            }
        }
    }

    fn connect_all(&mut self) -> Vec<Effect> {
        self.connections
            .connect_all()
            .into_iter()
            .map(Effect::Channel)
            .collect()
    }

    fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Vec<Effect> {
        let request = self.refresh.begin(trigger, &self.document);
        self.document.apply_all(request.instructions);
        vec![Effect::Fetch {
            token: request.token,
            filters: request.filters,
        }]
    }

    fn complete_refresh(
        &mut self,
        token: RequestToken,
        result: Result<MetricsSnapshot, FetchError>,
    ) -> Vec<Effect> {
        let request_filters = self.refresh.finish(token).unwrap_or_default();
        self.document.apply_all(refresh_loading(false));

        let mut snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(%token, error = %e, status = ?e.status(), "Error refreshing data");
                return self.show_error(&e.into()).into_iter().collect();
            }
        };

        if !self.refresh.try_apply(token) {
            debug!(
                %token,
                last_applied = ?self.refresh.last_applied(),
                "Dropping stale fetch result"
            );
            return Vec::new();
        }

        for name in fill_missing_groups(&mut snapshot, request_filters.active_group()) {
            warn!(collaborator = %name, "Collaborator without group, inferred");
        }

        let mut effects = self.render(&snapshot);
        self.document.apply(render_collaborator_table(&snapshot));
        effects.push(Effect::Schedule {
            after: self.config.counter.duration,
            command: Box::new(Command::CheckHealth),
        });
        effects
    }

    fn on_metrics_frame(&mut self, text: &str) -> Vec<Effect> {
        let mut snapshot = match ChannelFrame::<MetricsSnapshot>::parse(text) {
            Ok(ChannelFrame::Payload(snapshot)) => snapshot,
            Ok(ChannelFrame::Ping) => {
                debug!("Metrics channel ping");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Malformed metrics frame dropped");
                return Vec::new();
            }
        };

        let token = self.refresh.accept_push();
        debug!(%token, timestamp = %snapshot.timestamp, "Metrics pushed");
        let active_group = self.document.filters().active_group();
        fill_missing_groups(&mut snapshot, active_group);
        self.render(&snapshot)
    }

    fn on_alerts_frame(&mut self, text: &str) {
        match ChannelFrame::<AlertBatch>::parse(text) {
            Ok(ChannelFrame::Payload(batch)) => {
                debug!(count = batch.alerts.len(), "Alerts pushed");
                self.document.apply(render_alerts(&batch.alerts));
            }
            Ok(ChannelFrame::Ping) => debug!("Alerts channel ping"),
            Err(e) => warn!(error = %e, "Malformed alerts frame dropped"),
        }
    }

    /// Run the render pipeline and apply what it produced
    fn render(&mut self, snapshot: &MetricsSnapshot) -> Vec<Effect> {
        let plan = render_snapshot(snapshot, &mut self.cache, &self.document, self.config.counter);
        self.document.apply_all(plan.instructions);

        let mut effects: Vec<Effect> = plan
            .animations
            .into_iter()
            .map(|(target, animation)| {
                let generation = self.counter_generations.entry(target).or_insert(0);
                *generation += 1;
                Effect::Animate {
                    target,
                    generation: *generation,
                    animation,
                }
            })
            .collect();

        if let Some(failure) = plan.failure {
            error!(error = %failure, timestamp = %snapshot.timestamp, "Failed to render metrics");
            effects.extend(self.show_error(&failure.into()));
        }
        effects
    }

    /// Push the banner for `error` and schedule its removal
    fn show_error(&mut self, error: &PulseError) -> Option<Effect> {
        let target = ElementId::CollaboratorMetrics;
        if !self.document.contains(target) {
            return None;
        }
        self.next_banner += 1;
        let id = self.next_banner;
        self.document.apply(Instruction::PushBanner {
            target,
            banner: Banner {
                id,
                message: banner_message(error).to_string(),
            },
        });
        Some(Effect::Schedule {
            after: self.config.banner_ttl,
            command: Box::new(Command::DismissBanner { target, id }),
        })
    }

    fn run_health_check(&mut self) {
        let (report, instruction) = check_health(&self.document, self.connections.all_open());
        self.document.apply(instruction);
        self.last_health = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chart, Node};
    use pulse_core::{Group, GroupLabel};

    const EXAMPLE: &str = r#"{
        "total_metrics": {"total_contracts": 12, "total_verified": 5, "total_other": 7},
        "collaborator_metrics": {
            "A": {"grupo": "JULIO", "status_counts": {"verified": 5}, "avg_resolution_time": 2.25}
        },
        "timestamp": "t1"
    }"#;

    fn config() -> SessionConfig {
        SessionConfig {
            ws_base: Url::parse("ws://127.0.0.1:8000").unwrap(),
            retry: RetryPolicy::default(),
            banner_ttl: Duration::from_secs(5),
            counter: CounterSettings::default(),
        }
    }

    fn example() -> MetricsSnapshot {
        serde_json::from_str(EXAMPLE).unwrap()
    }

    /// Start the session and open both channels; returns the startup fetch token
    fn started(session: &mut Session) -> RequestToken {
        let effects = session.handle(Command::Start);
        let epoch = session.connections().epoch();
        for channel in ChannelKind::ALL {
            session.handle(Command::ChannelOpened { channel, epoch });
        }
        fetch_token(&effects).unwrap()
    }

    fn fetch_token(effects: &[Effect]) -> Option<RequestToken> {
        effects.iter().find_map(|effect| match effect {
            Effect::Fetch { token, .. } => Some(*token),
            _ => None,
        })
    }

    /// Jump every animation straight to its final frame
    fn finish_animations(session: &mut Session, effects: Vec<Effect>) {
        for effect in effects {
            if let Effect::Animate {
                target,
                generation,
                animation,
            } = effect
            {
                session.handle(Command::CounterFrame {
                    target,
                    generation,
                    value: animation.frame(animation.steps),
                });
            }
        }
    }

    fn push(session: &mut Session, channel: ChannelKind, text: &str) -> Vec<Effect> {
        let epoch = session.connections().epoch();
        session.handle(Command::ChannelMessage {
            channel,
            epoch,
            text: text.to_string(),
        })
    }

    fn banners(session: &Session) -> Vec<String> {
        session
            .document()
            .get(ElementId::CollaboratorMetrics)
            .unwrap()
            .banners
            .iter()
            .map(|b| b.message.clone())
            .collect()
    }

    #[test]
    fn test_start_connects_and_fetches() {
        let mut session = Session::new(config());
        let effects = session.handle(Command::Start);

        let connects = effects
            .iter()
            .filter(|e| matches!(e, Effect::Channel(ChannelAction::Connect { .. })))
            .count();
        assert_eq!(connects, 2);
        assert!(fetch_token(&effects).is_some());
        assert!(session.document().is_loading());
    }

    #[test]
    fn test_metrics_open_clears_loading_close_sets_it() {
        let mut session = Session::new(config());
        session.handle(Command::Start);
        let epoch = session.connections().epoch();
        session.handle(Command::ChannelOpened {
            channel: ChannelKind::Metrics,
            epoch,
        });
        assert!(!session.document().is_loading());

        session.handle(Command::ChannelClosed {
            channel: ChannelKind::Metrics,
            epoch,
            reason: "reset".into(),
        });
        assert!(session.document().is_loading());
    }

    #[test]
    fn test_refresh_renders_table_and_schedules_health() {
        let mut session = Session::new(config());
        let token = started(&mut session);

        let effects = session.handle(Command::FetchCompleted {
            token,
            result: Ok(example()),
        });
        assert!(!session.document().is_loading());

        let health_scheduled = effects.iter().any(|e| {
            matches!(e, Effect::Schedule { command, .. } if matches!(**command, Command::CheckHealth))
        });
        assert!(health_scheduled);
        finish_animations(&mut session, effects);

        let document = session.document();
        assert_eq!(document.text(ElementId::TotalContracts), Some("12"));
        assert_eq!(document.text(ElementId::TotalVerified), Some("5"));
        assert_eq!(document.text(ElementId::LastUpdate), Some("t1"));

        let cards = &document.get(ElementId::CollaboratorMetrics).unwrap().children;
        assert_eq!(cards[0], Node::GroupHeader { group: Group::Julio });
        let Node::CollaboratorCard(card) = &cards[1] else {
            panic!("expected card");
        };
        assert_eq!((card.name.as_str(), card.verified, card.resolution.as_str()), ("A", 5, "2.3"));

        let Some(Chart::Donut(donut)) = &document.get(ElementId::StatusChart).unwrap().chart else {
            panic!("expected donut");
        };
        assert_eq!(donut.slices[0].label, "Verificados");
        assert_eq!(donut.slices[0].value, 5);

        let rows = &document.get(ElementId::ColaboradoresTable).unwrap().children;
        assert_eq!(rows.len(), 1);

        session.handle(Command::CheckHealth);
        let report = session.last_health().unwrap();
        assert!(report.realtime && report.charts && report.filters);
        // totalAnalysis and totalApproved are legitimately 0 here
        assert!(!report.data);
    }

    #[test]
    fn test_stale_fetch_after_push_is_dropped() {
        let mut session = Session::new(config());
        let token = started(&mut session);

        push(&mut session, ChannelKind::Metrics, EXAMPLE);
        assert_eq!(session.document().text(ElementId::LastUpdate), Some("t1"));

        let mut old = example();
        old.timestamp = "t0".into();
        let effects = session.handle(Command::FetchCompleted {
            token,
            result: Ok(old),
        });
        assert!(effects.is_empty());
        assert_eq!(session.document().text(ElementId::LastUpdate), Some("t1"));
        assert!(!session.document().is_loading());
    }

    #[test]
    fn test_ping_and_malformed_frames_are_ignored() {
        let mut session = Session::new(config());
        started(&mut session);
        let before = session.document().clone();

        assert!(push(&mut session, ChannelKind::Metrics, r#"{"type":"ping"}"#).is_empty());
        assert!(push(&mut session, ChannelKind::Alerts, r#"{"type":"ping"}"#).is_empty());
        assert!(push(&mut session, ChannelKind::Metrics, "{not json").is_empty());
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn test_missing_totals_shows_banner_and_keeps_counters() {
        let mut session = Session::new(config());
        started(&mut session);

        let effects = push(&mut session, ChannelKind::Metrics, r#"{"timestamp":"t2"}"#);
        assert_eq!(session.document().text(ElementId::TotalContracts), Some("0"));
        assert_eq!(session.document().text(ElementId::LastUpdate), Some(""));
        assert_eq!(banners(&session), vec![RENDER_ERROR_MESSAGE.to_string()]);

        let dismissal = effects
            .into_iter()
            .find_map(|e| match e {
                Effect::Schedule { after, command } => Some((after, *command)),
                _ => None,
            })
            .unwrap();
        assert_eq!(dismissal.0, Duration::from_secs(5));
        session.handle(dismissal.1);
        assert!(banners(&session).is_empty());
    }

    #[test]
    fn test_fetch_failure_shows_retry_banner() {
        let mut session = Session::new(config());
        let token = started(&mut session);

        session.handle(Command::FetchCompleted {
            token,
            result: Err(FetchError::Status(500)),
        });
        assert_eq!(banners(&session), vec![REFRESH_ERROR_MESSAGE.to_string()]);
        assert!(!session.document().is_loading());
    }

    #[test]
    fn test_banner_message_follows_error_kind() {
        use pulse_core::{ChannelError, SnapshotError};

        let render: PulseError = SnapshotError::MissingCollaboratorMetrics.into();
        assert_eq!(banner_message(&render), RENDER_ERROR_MESSAGE);

        let fetch: PulseError = FetchError::Decode("eof".into()).into();
        assert_eq!(banner_message(&fetch), REFRESH_ERROR_MESSAGE);

        let channel: PulseError = ChannelError::Closed.into();
        assert_eq!(banner_message(&channel), REFRESH_ERROR_MESSAGE);
    }

    #[test]
    fn test_close_of_both_channels_reconnects_once() {
        let mut session = Session::new(config());
        started(&mut session);
        let epoch = session.connections().epoch();

        let mut scheduled = Vec::new();
        for channel in ChannelKind::ALL {
            scheduled.extend(session.handle(Command::ChannelClosed {
                channel,
                epoch,
                reason: "gone".into(),
            }));
        }
        assert_eq!(scheduled.len(), 1);
        let Effect::Schedule { after, command } = scheduled.remove(0) else {
            panic!("expected a scheduled reconnect");
        };
        assert_eq!(after, Duration::from_millis(2000));

        let effects = session.handle(*command);
        let connects: Vec<ChannelKind> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::Channel(ChannelAction::Connect { channel, .. }) => Some(*channel),
                _ => None,
            })
            .collect();
        assert_eq!(connects, vec![ChannelKind::Metrics, ChannelKind::Alerts]);
    }

    #[test]
    fn test_alerts_push_replaces_list() {
        let mut session = Session::new(config());
        started(&mut session);

        push(
            &mut session,
            ChannelKind::Alerts,
            r#"{"alerts":[{"type":"warning","message":"fila","created_at":"x"}]}"#,
        );
        let alerts = &session.document().get(ElementId::AlertsContainer).unwrap().children;
        assert!(matches!(&alerts[0], Node::Alert(a) if a.message == "fila"));

        push(&mut session, ChannelKind::Alerts, r#"{"alerts":[]}"#);
        let alerts = &session.document().get(ElementId::AlertsContainer).unwrap().children;
        assert!(matches!(&alerts[0], Node::Notice { .. }));
    }

    #[test]
    fn test_group_change_refreshes_options_then_fetches() {
        let mut session = Session::new(config());
        let token = started(&mut session);
        session.handle(Command::FetchCompleted {
            token,
            result: Ok(example()),
        });

        let effects = session.handle(Command::FilterChanged {
            control: FilterControl::Group,
            value: "LEANDRO".into(),
        });
        let options = &session.document().get(ElementId::ColaboradorFilter).unwrap().options;
        assert_eq!(options.len(), 1);

        let filters = effects
            .iter()
            .find_map(|e| match e {
                Effect::Fetch { filters, .. } => Some(filters.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(filters.grupo, "LEANDRO");
    }

    #[test]
    fn test_inference_uses_group_filter_at_request_time() {
        let mut session = Session::new(config());
        started(&mut session);

        let effects = session.handle(Command::FilterChanged {
            control: FilterControl::Group,
            value: "LEANDRO".into(),
        });
        let token = fetch_token(&effects).unwrap();
        session.handle(Command::FilterChanged {
            control: FilterControl::Group,
            value: String::new(),
        });

        let snapshot: MetricsSnapshot = serde_json::from_str(
            r#"{"total_metrics": {}, "collaborator_metrics": {"X-1": {}, "JULIO-003": {}}}"#,
        )
        .unwrap();
        session.handle(Command::FetchCompleted {
            token,
            result: Ok(snapshot),
        });

        assert_eq!(session.group_cache().members(Group::Leandro), ["X-1"]);
        assert_eq!(session.group_cache().members(Group::Julio), ["JULIO-003"]);
        let rows = &session.document().get(ElementId::ColaboradoresTable).unwrap().children;
        let groups: Vec<&str> = rows
            .iter()
            .filter_map(|n| match n {
                Node::TableRow(row) => Some(row.group.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![GroupLabel::Known(Group::Julio).as_str(), "LEANDRO"]);
    }

    #[test]
    fn test_superseded_counter_frames_are_dropped() {
        let mut session = Session::new(config());
        started(&mut session);

        let first = push(&mut session, ChannelKind::Metrics, EXAMPLE);
        let second = push(&mut session, ChannelKind::Metrics, EXAMPLE);

        finish_animations(&mut session, second);
        let Some(Effect::Animate {
            target, generation, ..
        }) = first.into_iter().next()
        else {
            panic!("expected an animation");
        };
        session.handle(Command::CounterFrame {
            target,
            generation,
            value: 999,
        });
        assert_eq!(session.document().text(ElementId::TotalContracts), Some("12"));
    }

    #[test]
    fn test_shutdown_disconnects_and_stops() {
        let mut session = Session::new(config());
        started(&mut session);

        let effects = session.handle(Command::Shutdown);
        assert_eq!(effects.len(), 2);
        assert!(session.is_stopped());
        assert!(session.handle(Command::Refresh(RefreshTrigger::Manual)).is_empty());
    }
}
