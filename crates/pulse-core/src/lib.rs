//! # Pulse Core
//!
//! Wire types, status buckets, and errors shared by the Contract Pulse
//! dashboard crates.
//!
//! The backend publishes [`MetricsSnapshot`]s (over the metrics channel and
//! the `/api/metrics` endpoint) and [`AlertBatch`]es (over the alerts
//! channel). Everything in this crate is plain data plus the small amount of
//! client-side normalization the dashboard applies before rendering.
//!
//! ## Key Types
//!
//! - [`MetricsSnapshot`]: Latest totals and per-collaborator metrics
//! - [`StatusKey`]: The ten mutually exclusive contract status buckets
//! - [`Group`] / [`GroupLabel`]: Collaborator groups as the backend labels them
//! - [`FilterState`]: The four query filters read at refresh time
//! - [`ChannelFrame`]: A decoded inbound real-time frame

pub mod alert;
pub mod error;
pub mod filter;
pub mod group;
pub mod inference;
pub mod snapshot;
pub mod status;

pub use alert::*;
pub use error::*;
pub use filter::*;
pub use group::*;
pub use inference::*;
pub use snapshot::*;
pub use status::*;
