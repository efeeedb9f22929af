//! Metrics snapshots and real-time frames

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::group::GroupLabel;
use crate::status::StatusKey;

/// Collaborator name as sent by the backend
pub type CollaboratorName = String;

/// Latest metrics as published by the backend
///
/// A snapshot replaces the previous one wholesale. `total_metrics` and
/// `collaborator_metrics` are optional on the wire so that their absence
/// surfaces as a render failure instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub total_metrics: Option<TotalMetrics>,
    #[serde(default)]
    pub collaborator_metrics: Option<BTreeMap<CollaboratorName, CollaboratorMetrics>>,
    #[serde(default)]
    pub timestamp: String,
}

/// Totals across all contracts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalMetrics {
    pub total_contracts: u64,
    pub total_verified: u64,
    pub total_analysis: u64,
    pub total_approved: u64,
    pub total_pending: u64,
    pub total_paid: u64,
    pub total_seized: u64,
    pub total_priority: u64,
    pub total_high_priority: u64,
    pub total_cancelled: u64,
    pub total_other: u64,
}

impl TotalMetrics {
    /// Count for one status bucket
    pub fn bucket(&self, status: StatusKey) -> u64 {
        match status {
            StatusKey::Verified => self.total_verified,
            StatusKey::Analysis => self.total_analysis,
            StatusKey::Approved => self.total_approved,
            StatusKey::Pending => self.total_pending,
            StatusKey::Paid => self.total_paid,
            StatusKey::Seized => self.total_seized,
            StatusKey::Priority => self.total_priority,
            StatusKey::HighPriority => self.total_high_priority,
            StatusKey::Cancelled => self.total_cancelled,
            StatusKey::Other => self.total_other,
        }
    }

    /// Bucket counts in display order
    pub fn buckets(&self) -> [(StatusKey, u64); 10] {
        StatusKey::ALL.map(|status| (status, self.bucket(status)))
    }
}

/// Metrics for one collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorMetrics {
    #[serde(default)]
    pub grupo: Option<GroupLabel>,
    /// Counts keyed by status; unknown keys are kept and count toward the total
    #[serde(default)]
    pub status_counts: BTreeMap<String, u64>,
    /// Average resolution time in hours
    #[serde(default)]
    pub avg_resolution_time: f64,
}

impl CollaboratorMetrics {
    /// Count for a status, 0 when the backend omitted it
    pub fn count(&self, status: StatusKey) -> u64 {
        self.status_counts.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Sum of every status count
    pub fn total(&self) -> u64 {
        self.status_counts.values().sum()
    }
}

/// Payload of the alerts channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertBatch {
    #[serde(default)]
    pub alerts: Vec<crate::alert::Alert>,
}

/// A decoded inbound frame from a real-time channel
///
/// The backend pings every subscriber periodically with `{"type":"ping"}`;
/// those frames carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelFrame<T> {
    Ping,
    Payload(T),
}

impl<T: DeserializeOwned> ChannelFrame<T> {
    /// Decode a text frame
    pub fn parse(text: &str) -> Result<Self, ChannelError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ChannelError::Decode(e.to_string()))?;

        if value.get("type").and_then(|t| t.as_str()) == Some("ping") {
            return Ok(ChannelFrame::Ping);
        }

        serde_json::from_value(value)
            .map(ChannelFrame::Payload)
            .map_err(|e| ChannelError::Decode(e.to_string()))
    }
}
