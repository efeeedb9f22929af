//! Client-side group inference
//!
//! The backend sometimes omits `grupo` on collaborator entries or sends it
//! blank; both count as missing. The fallback chain is: a known group name
//! contained in the collaborator name, then the active group filter, then
//! `N/A`.

use crate::group::{Group, GroupLabel};
use crate::snapshot::MetricsSnapshot;

/// Infer the group for a collaborator that arrived without one
pub fn infer_group(collaborator: &str, active_filter: Option<Group>) -> GroupLabel {
    if let Some(group) = Group::ALL
        .iter()
        .copied()
        .find(|group| collaborator.contains(group.as_str()))
    {
        return GroupLabel::Known(group);
    }

    match active_filter {
        Some(group) => GroupLabel::Known(group),
        None => GroupLabel::Unassigned,
    }
}

/// Fill in `grupo` for every collaborator entry lacking one or carrying a
/// blank one
///
/// Returns the names of the entries that were patched.
pub fn fill_missing_groups(
    snapshot: &mut MetricsSnapshot,
    active_filter: Option<Group>,
) -> Vec<String> {
    let Some(collaborators) = snapshot.collaborator_metrics.as_mut() else {
        return Vec::new();
    };

    let mut patched = Vec::new();
    for (name, metrics) in collaborators.iter_mut() {
        if metrics.grupo.as_ref().is_none_or(GroupLabel::is_blank) {
            metrics.grupo = Some(infer_group(name, active_filter));
            patched.push(name.clone());
        }
    }
    patched
}
