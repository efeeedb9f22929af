//! Query filters

use serde::{Deserialize, Serialize};

use crate::group::Group;

/// The four filters read at refresh time
///
/// Empty strings mean "no filter" and are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub grupo: String,
    pub collaborator: String,
    pub status: String,
    pub date: String,
}

impl FilterState {
    /// Query pairs for `/api/metrics`, only the non-empty ones
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("grupo", &self.grupo),
            ("collaborator", &self.collaborator),
            ("status", &self.status),
            ("data", &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name, value.clone()))
        .collect()
    }

    /// The group filter, when it names a known group
    pub fn active_group(&self) -> Option<Group> {
        Group::parse(&self.grupo)
    }
}
