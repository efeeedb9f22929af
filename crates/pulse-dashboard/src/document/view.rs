//! View nodes placed into container elements
//!
//! These are structured stand-ins for markup: the UI decides how each one
//! looks, the render pipeline only decides what they say.

use pulse_core::Group;

/// One child of a container element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// "Grupo JULIO" heading above a group's cards
    GroupHeader { group: Group },
    CollaboratorCard(CardView),
    TableRow(RowView),
    Alert(AlertView),
    /// Informational text shown in place of an empty list
    Notice { text: String },
    HealthChecklist(Vec<CheckView>),
}

/// Per-collaborator card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub name: String,
    pub group: String,
    pub verified: u64,
    pub analysis: u64,
    pub approved: u64,
    /// Average resolution time, one decimal place
    pub resolution: String,
}

/// Row of the collaborators table
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub name: String,
    pub group: String,
    pub total: u64,
    pub verified: u64,
    pub analysis: u64,
    pub approved: u64,
    /// Average resolution time with unit, e.g. `2.3h`
    pub resolution: String,
}

/// A rendered alert
#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub style_class: &'static str,
    pub icon: &'static str,
    pub message: String,
    pub created_at: String,
}

/// One line of the health checklist
#[derive(Debug, Clone, PartialEq)]
pub struct CheckView {
    pub label: &'static str,
    pub passed: bool,
}

/// Transient error banner
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u64,
    pub message: String,
}

/// Entry of a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The "all" entry every filter starts with
    pub fn placeholder() -> Self {
        Self::new("", "Todos")
    }
}

/// Chart data for a chart container
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Donut(DonutChart),
    Bar(BarChart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    pub slices: Vec<Slice>,
    /// Inner radius as a fraction of the outer radius
    pub hole: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub value: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub color: &'static str,
    pub y_title: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Hours rounded to one decimal place, halves rounded away from zero
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 10.0).round() / 10.0;
    format!("{:.1}", rounded)
}
