//! Alert list

use pulse_core::Alert;

use crate::document::{AlertView, ElementId, Instruction, Node};

pub const NO_ALERTS_NOTICE: &str = "Nenhum alerta ativo no momento.";

/// Replace the alert list with `alerts`
pub fn render_alerts(alerts: &[Alert]) -> Instruction {
    let nodes = if alerts.is_empty() {
        vec![Node::Notice {
            text: NO_ALERTS_NOTICE.to_string(),
        }]
    } else {
        alerts
            .iter()
            .map(|alert| {
                Node::Alert(AlertView {
                    style_class: alert.kind.style_class(),
                    icon: alert.kind.icon(),
                    message: alert.message.clone(),
                    created_at: alert.formatted_created_at(),
                })
            })
            .collect()
    };

    Instruction::ReplaceChildren {
        target: ElementId::AlertsContainer,
        nodes,
    }
}
