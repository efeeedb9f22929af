//! Status donut and resolution-time bars

use std::collections::BTreeMap;

use pulse_core::{CollaboratorMetrics, TotalMetrics};

use crate::document::{Bar, BarChart, Chart, DonutChart, Slice};

/// Inner radius of the status donut
pub const DONUT_HOLE: f64 = 0.4;

/// Single fill for every resolution bar
pub const BAR_COLOR: &str = "#0d6efd";

pub const BAR_Y_TITLE: &str = "Horas";

/// One slice per status bucket, fixed order and palette
pub fn status_chart(totals: &TotalMetrics) -> Chart {
    let slices = totals
        .buckets()
        .into_iter()
        .map(|(status, value)| Slice {
            label: status.label(),
            value,
            color: status.color(),
        })
        .collect();

    Chart::Donut(DonutChart {
        slices,
        hole: DONUT_HOLE,
    })
}

/// Average resolution time per collaborator, in map order
pub fn resolution_chart(collaborators: &BTreeMap<String, CollaboratorMetrics>) -> Chart {
    let bars = collaborators
        .iter()
        .map(|(name, metrics)| Bar {
            label: name.clone(),
            value: metrics.avg_resolution_time,
        })
        .collect();

    Chart::Bar(BarChart {
        bars,
        color: BAR_COLOR,
        y_title: BAR_Y_TITLE,
    })
}
