//! Error types for Contract Pulse

use thiserror::Error;

/// Top-level error type for the dashboard
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// A snapshot is missing data the render pipeline cannot do without
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Snapshot has no total_metrics")]
    MissingTotalMetrics,

    #[error("Snapshot has no collaborator_metrics")]
    MissingCollaboratorMetrics,
}

/// Errors from the `/api/metrics` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Status code carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors from a real-time channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Channel closed")]
    Closed,

    #[error("Malformed frame: {0}")]
    Decode(String),
}
