//! Health monitor

use crate::document::{CheckView, Document, ElementId, Instruction, Node};

/// Outcome of the four independent dashboard checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Both real-time channels open
    pub realtime: bool,
    /// Both chart containers present
    pub charts: bool,
    /// All four filter controls present
    pub filters: bool,
    /// Headline counters present and showing something other than `0`
    pub data: bool,
}

impl HealthReport {
    pub fn evaluate(document: &Document, realtime_open: bool) -> Self {
        Self {
            realtime: realtime_open,
            charts: [ElementId::StatusChart, ElementId::ResolutionChart]
                .into_iter()
                .all(|id| document.contains(id)),
            filters: ElementId::FILTERS.into_iter().all(|id| document.contains(id)),
            data: ElementId::COUNTERS.into_iter().all(|id| {
                document
                    .text(id)
                    .map(|text| !text.is_empty() && text != "0")
                    .unwrap_or(false)
            }),
        }
    }

    pub fn all_pass(&self) -> bool {
        self.realtime && self.charts && self.filters && self.data
    }

    pub fn checks(&self) -> [CheckView; 4] {
        [
            CheckView {
                label: "Conexão em tempo real",
                passed: self.realtime,
            },
            CheckView {
                label: "Gráficos",
                passed: self.charts,
            },
            CheckView {
                label: "Filtros",
                passed: self.filters,
            },
            CheckView {
                label: "Dados",
                passed: self.data,
            },
        ]
    }

    /// Checklist panel for `healthStatus`
    pub fn render(&self) -> Instruction {
        Instruction::ReplaceChildren {
            target: ElementId::HealthStatus,
            nodes: vec![Node::HealthChecklist(self.checks().to_vec())],
        }
    }
}

/// Evaluate, log failures, and produce the checklist instruction
pub fn check_health(document: &Document, realtime_open: bool) -> (HealthReport, Instruction) {
    let report = HealthReport::evaluate(document, realtime_open);
    if !report.all_pass() {
        tracing::warn!(
            realtime = report.realtime,
            charts = report.charts,
            filters = report.filters,
            data = report.data,
            "Dashboard health check failed"
        );
    }
    (report, report.render())
}
