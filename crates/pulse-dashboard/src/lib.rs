//! Contract Pulse dashboard
//!
//! A live view of contract-processing metrics. Snapshots arrive two ways:
//! pushed over the `/ws/metrics` channel and fetched from `/api/metrics`
//! with the current filters. Alerts arrive over `/ws/alerts`.
//!
//! The crate is split into a synchronous core and a thin async shell:
//!
//! - [`session`] owns all dashboard state and turns [`session::Command`]s into
//!   render instructions plus [`session::Effect`]s
//! - [`render`], [`filters`] and [`health`] are the pure pieces it drives
//! - [`document`] is the render surface the instructions apply to
//! - [`runtime`] runs effects on tokio (websockets, HTTP, timers)
//! - [`components`] draws a published document with Dioxus

pub mod components;
pub mod config;
pub mod connection;
pub mod document;
pub mod filters;
pub mod health;
pub mod refresh;
pub mod render;
pub mod runtime;
pub mod session;

pub use config::{ConfigError, DashboardConfig};
pub use connection::{ChannelKind, ChannelState, ConnectionManager, RetryPolicy};
pub use document::{Document, ElementId, Instruction, RenderSink};
pub use health::HealthReport;
pub use refresh::{RefreshOrchestrator, RefreshTrigger, RequestToken};
pub use runtime::{spawn_dashboard, DashboardHandle, HttpMetricsApi, MetricsApi};
pub use session::{Command, Effect, Session, SessionConfig};
