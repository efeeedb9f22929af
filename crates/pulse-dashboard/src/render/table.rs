//! Collaborator table rows

use std::collections::BTreeMap;

use pulse_core::{CollaboratorMetrics, StatusKey, UNASSIGNED_LABEL};

use crate::document::{format_hours, Node, RowView};

/// One row per collaborator, sorted by name
///
/// Entries with any group label appear here, including ones the card
/// section leaves out.
pub fn render_table(collaborators: &BTreeMap<String, CollaboratorMetrics>) -> Vec<Node> {
    collaborators
        .iter()
        .map(|(name, metrics)| {
            Node::TableRow(RowView {
                name: name.clone(),
                group: metrics
                    .grupo
                    .as_ref()
                    .map(|label| label.as_str().to_string())
                    .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
                total: metrics.total(),
                verified: metrics.count(StatusKey::Verified),
                analysis: metrics.count(StatusKey::Analysis),
                approved: metrics.count(StatusKey::Approved),
                resolution: format!("{}h", format_hours(metrics.avg_resolution_time)),
            })
        })
        .collect()
}
