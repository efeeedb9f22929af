//! Contract status buckets
//!
//! The order of [`StatusKey::ALL`] is a visual contract: the donut chart,
//! the status filter and the palette all follow it.

use serde::{Deserialize, Serialize};

/// One of the ten mutually exclusive status buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    Verified,
    Analysis,
    Approved,
    Pending,
    Paid,
    Seized,
    Priority,
    HighPriority,
    Cancelled,
    Other,
}

impl StatusKey {
    /// All buckets in display order
    pub const ALL: [StatusKey; 10] = [
        StatusKey::Verified,
        StatusKey::Analysis,
        StatusKey::Approved,
        StatusKey::Pending,
        StatusKey::Paid,
        StatusKey::Seized,
        StatusKey::Priority,
        StatusKey::HighPriority,
        StatusKey::Cancelled,
        StatusKey::Other,
    ];

    /// Key used in `status_counts` and in the `status` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Verified => "verified",
            StatusKey::Analysis => "analysis",
            StatusKey::Approved => "approved",
            StatusKey::Pending => "pending",
            StatusKey::Paid => "paid",
            StatusKey::Seized => "seized",
            StatusKey::Priority => "priority",
            StatusKey::HighPriority => "high_priority",
            StatusKey::Cancelled => "cancelled",
            StatusKey::Other => "other",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            StatusKey::Verified => "Verificados",
            StatusKey::Analysis => "Em Análise",
            StatusKey::Approved => "Aprovados",
            StatusKey::Pending => "Pendentes",
            StatusKey::Paid => "Quitados",
            StatusKey::Seized => "Apreendidos",
            StatusKey::Priority => "Prioridade",
            StatusKey::HighPriority => "Prioridade Total",
            StatusKey::Cancelled => "Cancelados",
            StatusKey::Other => "Outros",
        }
    }

    /// Chart color for this bucket
    pub fn color(&self) -> &'static str {
        match self {
            StatusKey::Verified => "#198754",
            StatusKey::Analysis => "#0d6efd",
            StatusKey::Approved => "#ffc107",
            StatusKey::Pending => "#6c757d",
            StatusKey::Paid => "#20c997",
            StatusKey::Seized => "#dc3545",
            StatusKey::Priority => "#fd7e14",
            StatusKey::HighPriority => "#e83e8c",
            StatusKey::Cancelled => "#6610f2",
            StatusKey::Other => "#adb5bd",
        }
    }

    /// Parse a `status_counts` key
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == key)
    }
}

impl std::fmt::Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_key() {
        for status in StatusKey::ALL {
            assert_eq!(StatusKey::parse(status.as_str()), Some(status));
        }
        assert_eq!(StatusKey::parse("archived"), None);
    }

    #[test]
    fn test_palette_is_one_color_per_bucket() {
        let mut colors: Vec<_> = StatusKey::ALL.iter().map(|s| s.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), StatusKey::ALL.len());
    }

    #[test]
    fn test_display_order() {
        assert_eq!(StatusKey::ALL[0].label(), "Verificados");
        assert_eq!(StatusKey::ALL[7].label(), "Prioridade Total");
        assert_eq!(StatusKey::ALL[9].label(), "Outros");
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        let json = serde_json::to_string(&StatusKey::HighPriority).unwrap();
        assert_eq!(json, "\"high_priority\"");
    }
}
