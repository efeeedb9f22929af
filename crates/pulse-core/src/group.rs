//! Collaborator groups

use serde::{Deserialize, Serialize};

/// Label shown for collaborators without a usable group
pub const UNASSIGNED_LABEL: &str = "N/A";

/// One of the two known collaborator groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Julio,
    Leandro,
}

impl Group {
    /// Known groups in display order
    pub const ALL: [Group; 2] = [Group::Julio, Group::Leandro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Julio => "JULIO",
            Group::Leandro => "LEANDRO",
        }
    }

    /// Parse an exact group name (`"JULIO"` or `"LEANDRO"`)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|group| group.as_str() == value)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group label as carried by a collaborator entry
///
/// The backend normally sends `"JULIO"`, `"LEANDRO"` or `"N/A"`, but any
/// other string is kept verbatim so it can still be shown in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupLabel {
    Known(Group),
    Unassigned,
    Other(String),
}

impl GroupLabel {
    /// The known group, if any
    pub fn group(&self) -> Option<Group> {
        match self {
            GroupLabel::Known(group) => Some(*group),
            _ => None,
        }
    }

    /// An empty or whitespace-only label, which carries no group at all
    pub fn is_blank(&self) -> bool {
        matches!(self, GroupLabel::Other(value) if value.trim().is_empty())
    }

    pub fn as_str(&self) -> &str {
        match self {
            GroupLabel::Known(group) => group.as_str(),
            GroupLabel::Unassigned => UNASSIGNED_LABEL,
            GroupLabel::Other(value) => value,
        }
    }
}

impl From<Group> for GroupLabel {
    fn from(group: Group) -> Self {
        GroupLabel::Known(group)
    }
}

impl From<String> for GroupLabel {
    fn from(value: String) -> Self {
        if let Some(group) = Group::parse(&value) {
            GroupLabel::Known(group)
        } else if value == UNASSIGNED_LABEL {
            GroupLabel::Unassigned
        } else {
            GroupLabel::Other(value)
        }
    }
}

impl From<GroupLabel> for String {
    fn from(label: GroupLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
