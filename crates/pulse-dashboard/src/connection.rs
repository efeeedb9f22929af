//! Real-time channel management
//!
//! Tracks the two subscriptions (metrics and alerts) as small state
//! machines. The manager does no I/O: it answers "what should happen now"
//! with [`ChannelAction`]s and reconnect delays, and the runtime carries
//! them out.
//!
//! Every [`ConnectionManager::connect_all`] starts a new epoch. Events tagged
//! with an older epoch come from handles that were already torn down and are
//! ignored.

use std::time::Duration;

use url::Url;

/// One of the two real-time subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    Metrics,
    Alerts,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Metrics, ChannelKind::Alerts];

    pub fn path(&self) -> &'static str {
        match self {
            ChannelKind::Metrics => "/ws/metrics",
            ChannelKind::Alerts => "/ws/alerts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Metrics => "metrics",
            ChannelKind::Alerts => "alerts",
        }
    }

    fn index(&self) -> usize {
        match self {
            ChannelKind::Metrics => 0,
            ChannelKind::Alerts => 1,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closing,
}

impl ChannelState {
    /// Whether a handle exists that must be torn down before reconnecting
    pub fn is_live(&self) -> bool {
        matches!(self, ChannelState::Connecting | ChannelState::Open)
    }
}

/// When to try again after a channel drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Same delay every time, no cap
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Delay before reconnect attempt number `attempt` (1-based)
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        match self.max_attempts {
            Some(max) if attempt > max => None,
            _ => Some(self.delay),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_millis(2000))
    }
}

/// Something the runtime must do to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    /// Tear down the current handle, if any
    Disconnect { channel: ChannelKind },
    /// Open a new handle; its events carry `epoch`
    Connect {
        channel: ChannelKind,
        url: Url,
        epoch: u64,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelLink {
    state: ChannelState,
}

/// State of both subscriptions plus reconnect bookkeeping
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    ws_base: Url,
    retry: RetryPolicy,
    links: [ChannelLink; 2],
    epoch: u64,
    reconnect_pending: bool,
    /// Consecutive reconnects since a channel last opened
    attempts: u32,
    shut_down: bool,
}

impl ConnectionManager {
    /// `ws_base` already carries the `ws`/`wss` scheme
    pub fn new(ws_base: Url, retry: RetryPolicy) -> Self {
        Self {
            ws_base,
            retry,
            links: [ChannelLink::default(); 2],
            epoch: 0,
            reconnect_pending: false,
            attempts: 0,
            shut_down: false,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self, channel: ChannelKind) -> ChannelState {
        self.links[channel.index()].state
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// Subscription URL for a channel
    pub fn url(&self, channel: ChannelKind) -> Url {
        let mut url = self.ws_base.clone();
        url.set_path(channel.path());
        url.set_query(None);
        url
    }

    /// (Re)open both channels, tearing down live handles first
    pub fn connect_all(&mut self) -> Vec<ChannelAction> {
        if self.shut_down {
            return Vec::new();
        }

        let mut actions: Vec<ChannelAction> = ChannelKind::ALL
            .into_iter()
            .filter(|kind| self.state(*kind).is_live())
            .map(|channel| ChannelAction::Disconnect { channel })
            .collect();

        self.epoch += 1;
        self.reconnect_pending = false;
        for channel in ChannelKind::ALL {
            self.links[channel.index()].state = ChannelState::Connecting;
            actions.push(ChannelAction::Connect {
                channel,
                url: self.url(channel),
                epoch: self.epoch,
            });
        }

        tracing::info!(epoch = self.epoch, "Connecting real-time channels");
        actions
    }

    /// Whether an event from `epoch` belongs to the current handles
    pub fn accepts(&self, channel: ChannelKind, epoch: u64) -> bool {
        epoch == self.epoch && self.state(channel).is_live()
    }

    /// Record a successful open; false when the event is stale
    pub fn on_open(&mut self, channel: ChannelKind, epoch: u64) -> bool {
        if !self.accepts(channel, epoch) {
            tracing::debug!(%channel, epoch, current = self.epoch, "Ignoring stale open");
            return false;
        }
        self.links[channel.index()].state = ChannelState::Open;
        self.attempts = 0;
        tracing::info!(%channel, epoch, "Channel open");
        true
    }

    /// Record a close (or an error, which counts as a close)
    ///
    /// Returns the delay after which both channels should be reconnected,
    /// or `None` when the event is stale, a reconnect is already pending, or
    /// the retry policy gave up.
    pub fn on_closed(&mut self, channel: ChannelKind, epoch: u64) -> Option<Duration> {
        if !self.accepts(channel, epoch) {
            tracing::debug!(%channel, epoch, current = self.epoch, "Ignoring stale close");
            return None;
        }
        self.links[channel.index()].state = ChannelState::Disconnected;

        if self.shut_down || self.reconnect_pending {
            return None;
        }

        self.attempts += 1;
        match self.retry.next_delay(self.attempts) {
            Some(delay) => {
                self.reconnect_pending = true;
                tracing::info!(
                    %channel,
                    attempt = self.attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Channel closed, reconnect scheduled"
                );
                Some(delay)
            }
            None => {
                tracing::warn!(%channel, attempts = self.attempts, "Channel closed, giving up");
                None
            }
        }
    }

    /// Both channels open
    pub fn all_open(&self) -> bool {
        ChannelKind::ALL
            .into_iter()
            .all(|kind| self.state(kind) == ChannelState::Open)
    }

    /// Tear everything down for good
    pub fn shutdown(&mut self) -> Vec<ChannelAction> {
        self.shut_down = true;
        self.reconnect_pending = false;
        let mut actions = Vec::new();
        for channel in ChannelKind::ALL {
            let link = &mut self.links[channel.index()];
            if link.state.is_live() {
                link.state = ChannelState::Closing;
                actions.push(ChannelAction::Disconnect { channel });
            }
        }
        actions
    }
}
