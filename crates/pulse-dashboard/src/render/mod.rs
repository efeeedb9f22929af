//! Render pipeline
//!
//! Turns a [`MetricsSnapshot`] into [`Instruction`]s. Nothing here touches
//! the document; callers apply the plan through a [`RenderSink`].
//!
//! The steps run in a fixed order and the pipeline stops at the first
//! failure. Whatever was produced before the failure is still part of the
//! plan and gets applied.
//!
//! [`RenderSink`]: crate::document::RenderSink

pub mod alerts;
pub mod cards;
pub mod charts;
pub mod counter;
pub mod table;

use pulse_core::{MetricsSnapshot, SnapshotError};

use crate::document::{Document, ElementId, Instruction};
use crate::filters::refresh_filter_options;

pub use alerts::render_alerts;
pub use cards::{render_cards, GroupCache};
pub use charts::{resolution_chart, status_chart};
pub use counter::{parse_displayed, CounterAnimation, CounterSettings};
pub use table::render_table;

/// Output of one pass of the pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    pub instructions: Vec<Instruction>,
    /// Counter animations to start, one per headline counter present
    pub animations: Vec<(ElementId, CounterAnimation)>,
    /// Set when a step could not run; later steps were skipped
    pub failure: Option<SnapshotError>,
}

impl RenderPlan {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    fn fail(mut self, error: SnapshotError) -> Self {
        self.failure = Some(error);
        self
    }
}

/// Render a snapshot against the current document
///
/// `cache` is rebuilt from the snapshot's collaborators before the filter
/// options are derived from it.
pub fn render_snapshot(
    snapshot: &MetricsSnapshot,
    cache: &mut GroupCache,
    document: &Document,
    counter: CounterSettings,
) -> RenderPlan {
    let mut plan = RenderPlan::default();

    let Some(totals) = snapshot.total_metrics.as_ref() else {
        return plan.fail(SnapshotError::MissingTotalMetrics);
    };

    for (target, value) in [
        (ElementId::TotalContracts, totals.total_contracts),
        (ElementId::TotalVerified, totals.total_verified),
        (ElementId::TotalAnalysis, totals.total_analysis),
        (ElementId::TotalApproved, totals.total_approved),
    ] {
        let Some(text) = document.text(target) else {
            continue;
        };
        let animation = CounterAnimation::new(parse_displayed(text), value as i64, counter);
        plan.animations.push((target, animation));
    }
    plan.instructions.push(Instruction::SetText {
        target: ElementId::LastUpdate,
        text: snapshot.timestamp.clone(),
    });

    cache.rebuild(snapshot.collaborator_metrics.as_ref());
    let cards = match snapshot.collaborator_metrics.as_ref() {
        Some(collaborators) if !collaborators.is_empty() => render_cards(collaborators, cache),
        _ => {
            tracing::error!("Snapshot has no collaborator metrics, clearing cards");
            Vec::new()
        }
    };
    plan.instructions.push(Instruction::ReplaceChildren {
        target: ElementId::CollaboratorMetrics,
        nodes: cards,
    });

    plan.instructions.push(Instruction::SetChart {
        target: ElementId::StatusChart,
        chart: status_chart(totals),
    });

    let Some(collaborators) = snapshot.collaborator_metrics.as_ref() else {
        return plan.fail(SnapshotError::MissingCollaboratorMetrics);
    };
    plan.instructions.push(Instruction::SetChart {
        target: ElementId::ResolutionChart,
        chart: resolution_chart(collaborators),
    });

    plan.instructions.extend(refresh_filter_options(document, cache));

    plan
}

/// Table body for a snapshot; cleared when the snapshot has no collaborators
pub fn render_collaborator_table(snapshot: &MetricsSnapshot) -> Instruction {
    Instruction::ReplaceChildren {
        target: ElementId::ColaboradoresTable,
        nodes: snapshot
            .collaborator_metrics
            .as_ref()
            .map(render_table)
            .unwrap_or_default(),
    }
}
