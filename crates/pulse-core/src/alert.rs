//! Alerts pushed over the alerts channel

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Severity of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Critical,
    Info,
    /// Anything the backend invents later renders like `Info`
    #[serde(other)]
    Unknown,
}

impl AlertKind {
    /// Style class suffix for the alert box
    pub fn style_class(&self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Critical => "danger",
            AlertKind::Info | AlertKind::Unknown => "info",
        }
    }

    /// Icon class for the alert box
    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Warning => "bi-exclamation-triangle",
            AlertKind::Critical => "bi-exclamation-circle",
            AlertKind::Info | AlertKind::Unknown => "bi-info-circle",
        }
    }
}

/// A single alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: AlertKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: String,
}

fn default_kind() -> AlertKind {
    AlertKind::Info
}

impl Alert {
    /// `created_at` formatted as `dd/mm/yyyy, HH:MM:SS`
    ///
    /// Offset-carrying timestamps are shown in local time, naive ones as
    /// sent. Anything unparseable is returned verbatim.
    pub fn formatted_created_at(&self) -> String {
        const FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return dt.with_timezone(&Local).format(FORMAT).to_string();
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&self.created_at, pattern) {
                return naive.format(FORMAT).to_string();
            }
        }
        self.created_at.clone()
    }
}
