//! In-memory render surface
//!
//! [`Document`] models the page as a set of elements keyed by their fixed
//! ids. The render pipeline never touches it directly: it produces
//! [`Instruction`]s, and anything implementing [`RenderSink`] applies them.

pub mod view;

use std::collections::{BTreeMap, BTreeSet};

use pulse_core::FilterState;

pub use view::*;

/// CSS class marking an element as busy
pub const LOADING_CLASS: &str = "loading";

/// The fixed element ids the dashboard renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    DashboardContainer,
    StatusChart,
    ResolutionChart,
    GrupoFilter,
    ColaboradorFilter,
    StatusFilter,
    DataFilter,
    TotalContracts,
    TotalVerified,
    TotalAnalysis,
    TotalApproved,
    LastUpdate,
    CollaboratorMetrics,
    AlertsContainer,
    ColaboradoresTable,
    RefreshBtn,
    HealthStatus,
}

impl ElementId {
    pub const ALL: [ElementId; 17] = [
        ElementId::DashboardContainer,
        ElementId::StatusChart,
        ElementId::ResolutionChart,
        ElementId::GrupoFilter,
        ElementId::ColaboradorFilter,
        ElementId::StatusFilter,
        ElementId::DataFilter,
        ElementId::TotalContracts,
        ElementId::TotalVerified,
        ElementId::TotalAnalysis,
        ElementId::TotalApproved,
        ElementId::LastUpdate,
        ElementId::CollaboratorMetrics,
        ElementId::AlertsContainer,
        ElementId::ColaboradoresTable,
        ElementId::RefreshBtn,
        ElementId::HealthStatus,
    ];

    /// The four headline counters
    pub const COUNTERS: [ElementId; 4] = [
        ElementId::TotalContracts,
        ElementId::TotalVerified,
        ElementId::TotalAnalysis,
        ElementId::TotalApproved,
    ];

    /// The four filter controls
    pub const FILTERS: [ElementId; 4] = [
        ElementId::GrupoFilter,
        ElementId::ColaboradorFilter,
        ElementId::StatusFilter,
        ElementId::DataFilter,
    ];

    /// The id attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::DashboardContainer => "dashboard-container",
            ElementId::StatusChart => "statusChart",
            ElementId::ResolutionChart => "resolutionChart",
            ElementId::GrupoFilter => "grupoFilter",
            ElementId::ColaboradorFilter => "colaboradorFilter",
            ElementId::StatusFilter => "statusFilter",
            ElementId::DataFilter => "dataFilter",
            ElementId::TotalContracts => "totalContracts",
            ElementId::TotalVerified => "totalVerified",
            ElementId::TotalAnalysis => "totalAnalysis",
            ElementId::TotalApproved => "totalApproved",
            ElementId::LastUpdate => "lastUpdate",
            ElementId::CollaboratorMetrics => "collaboratorMetrics",
            ElementId::AlertsContainer => "alerts-container",
            ElementId::ColaboradoresTable => "colaboradoresTable",
            ElementId::RefreshBtn => "refreshBtn",
            ElementId::HealthStatus => "healthStatus",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub children: Vec<Node>,
    /// Error banners shown above the children; they outlive re-renders
    pub banners: Vec<Banner>,
    pub options: Vec<SelectOption>,
    pub value: String,
    pub chart: Option<Chart>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// One render operation against an element
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    SetText { target: ElementId, text: String },
    SetValue { target: ElementId, value: String },
    ReplaceChildren { target: ElementId, nodes: Vec<Node> },
    /// Replace a select's options, keeping its value only if still offered
    SetOptions { target: ElementId, options: Vec<SelectOption> },
    SetChart { target: ElementId, chart: Chart },
    SetClass { target: ElementId, class: String, enabled: bool },
    PushBanner { target: ElementId, banner: Banner },
    DismissBanner { target: ElementId, id: u64 },
}

impl Instruction {
    pub fn target(&self) -> ElementId {
        match self {
            Instruction::SetText { target, .. }
            | Instruction::SetValue { target, .. }
            | Instruction::ReplaceChildren { target, .. }
            | Instruction::SetOptions { target, .. }
            | Instruction::SetChart { target, .. }
            | Instruction::SetClass { target, .. }
            | Instruction::PushBanner { target, .. }
            | Instruction::DismissBanner { target, .. } => *target,
        }
    }
}

/// Anything that can apply render instructions
pub trait RenderSink {
    fn apply(&mut self, instruction: Instruction);

    fn apply_all(&mut self, instructions: impl IntoIterator<Item = Instruction>)
    where
        Self: Sized,
    {
        for instruction in instructions {
            self.apply(instruction);
        }
    }
}

/// The page as a map of present elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: BTreeMap<ElementId, Element>,
}

impl Document {
    /// A document with no elements at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dashboard page as first loaded: every element present, counters
    /// at `0`, selects holding only their placeholder
    pub fn standard() -> Self {
        let mut document = Self::empty();
        for id in ElementId::ALL {
            document.insert(id);
        }
        for id in ElementId::COUNTERS {
            document.element_mut(id).text = "0".to_string();
        }
        for id in [
            ElementId::GrupoFilter,
            ElementId::ColaboradorFilter,
            ElementId::StatusFilter,
        ] {
            document.element_mut(id).options = vec![SelectOption::placeholder()];
        }
        document
    }

    /// Add an element (no-op if present)
    pub fn insert(&mut self, id: ElementId) {
        self.elements.entry(id).or_default();
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Text content, if the element exists
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|element| element.text.as_str())
    }

    /// Current value of a control, empty when the control is missing
    pub fn value(&self, id: ElementId) -> &str {
        self.get(id).map(|element| element.value.as_str()).unwrap_or("")
    }

    /// Whether the dashboard is showing its loading indicator
    pub fn is_loading(&self) -> bool {
        self.get(ElementId::DashboardContainer)
            .map(|element| element.has_class(LOADING_CLASS))
            .unwrap_or(false)
    }

    /// Read the four filter controls
    pub fn filters(&self) -> FilterState {
        FilterState {
            grupo: self.value(ElementId::GrupoFilter).to_string(),
            collaborator: self.value(ElementId::ColaboradorFilter).to_string(),
            status: self.value(ElementId::StatusFilter).to_string(),
            date: self.value(ElementId::DataFilter).to_string(),
        }
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        self.elements.entry(id).or_default()
    }
}

impl RenderSink for Document {
    /// Instructions for elements that are not in the document are dropped
    fn apply(&mut self, instruction: Instruction) {
        let Some(element) = self.elements.get_mut(&instruction.target()) else {
            tracing::debug!(target_id = %instruction.target(), "Render target missing, skipping");
            return;
        };

        match instruction {
            Instruction::SetText { text, .. } => element.text = text,
            Instruction::SetValue { value, .. } => element.value = value,
            Instruction::ReplaceChildren { nodes, .. } => element.children = nodes,
            Instruction::SetOptions { options, .. } => {
                if !options.iter().any(|option| option.value == element.value) {
                    element.value = String::new();
                }
                element.options = options;
            }
            Instruction::SetChart { chart, .. } => element.chart = Some(chart),
            Instruction::SetClass { class, enabled, .. } => {
                if enabled {
                    element.classes.insert(class);
                } else {
                    element.classes.remove(&class);
                }
            }
            Instruction::PushBanner { banner, .. } => element.banners.insert(0, banner),
            Instruction::DismissBanner { id, .. } => element.banners.retain(|b| b.id != id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_document_has_every_element() {
        let document = Document::standard();
        for id in ElementId::ALL {
            assert!(document.contains(id), "missing {}", id);
        }
        assert_eq!(document.text(ElementId::TotalContracts), Some("0"));
        assert_eq!(
            document.get(ElementId::GrupoFilter).unwrap().options,
            vec![SelectOption::placeholder()]
        );
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut document = Document::empty();
        document.apply(Instruction::SetText {
            target: ElementId::LastUpdate,
            text: "t1".into(),
        });
        assert!(!document.contains(ElementId::LastUpdate));
    }

    #[test]
    fn test_set_options_keeps_value_still_offered() {
        let mut document = Document::standard();
        document.apply(Instruction::SetValue {
            target: ElementId::ColaboradorFilter,
            value: "A".into(),
        });
        document.apply(Instruction::SetOptions {
            target: ElementId::ColaboradorFilter,
            options: vec![SelectOption::placeholder(), SelectOption::new("A", "A")],
        });
        assert_eq!(document.value(ElementId::ColaboradorFilter), "A");

        document.apply(Instruction::SetOptions {
            target: ElementId::ColaboradorFilter,
            options: vec![SelectOption::placeholder(), SelectOption::new("B", "B")],
        });
        assert_eq!(document.value(ElementId::ColaboradorFilter), "");
    }

    #[test]
    fn test_banners_newest_first_and_dismissable() {
        let mut document = Document::standard();
        for id in [1, 2] {
            document.apply(Instruction::PushBanner {
                target: ElementId::CollaboratorMetrics,
                banner: Banner {
                    id,
                    message: format!("error {}", id),
                },
            });
        }
        let banners = &document.get(ElementId::CollaboratorMetrics).unwrap().banners;
        assert_eq!(banners[0].id, 2);

        document.apply(Instruction::DismissBanner {
            target: ElementId::CollaboratorMetrics,
            id: 2,
        });
        let banners = &document.get(ElementId::CollaboratorMetrics).unwrap().banners;
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, 1);
    }

    #[test]
    fn test_loading_class_and_filters() {
        let mut document = Document::standard();
        document.apply(Instruction::SetClass {
            target: ElementId::DashboardContainer,
            class: LOADING_CLASS.into(),
            enabled: true,
        });
        assert!(document.is_loading());

        document.apply(Instruction::SetValue {
            target: ElementId::DataFilter,
            value: "2024-05-01".into(),
        });
        let filters = document.filters();
        assert_eq!(filters.date, "2024-05-01");
        assert!(filters.grupo.is_empty());
    }
}
