//! Pure SVG chart components
//!
//! Both charts render directly as SVG inside RSX from the chart data the
//! render pipeline produced.

use std::f64::consts::PI;

use dioxus::prelude::*;

use crate::document::{BarChart, DonutChart};

/// One drawable donut segment
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub path: String,
    pub color: &'static str,
    pub label: &'static str,
    pub value: u64,
    pub percent: f64,
}

/// Segment paths for a donut of diameter `size`
///
/// Zero-valued slices get no segment but still appear in the legend.
pub fn donut_segments(chart: &DonutChart, size: f64) -> Vec<DonutSegment> {
    let total: u64 = chart.slices.iter().map(|s| s.value).sum();
    if total == 0 {
        return Vec::new();
    }

    let center = size / 2.0;
    let outer = size / 2.0 - 2.0;
    let inner = outer * chart.hole;
    let point = |radius: f64, angle: f64| {
        (center + radius * angle.cos(), center + radius * angle.sin())
    };

    let mut segments = Vec::new();
    // Start at twelve o'clock, clockwise
    let mut start = -PI / 2.0;
    for slice in chart.slices.iter().filter(|s| s.value > 0) {
        let fraction = slice.value as f64 / total as f64;
        // A full circle has coincident endpoints and would draw nothing
        let sweep = (fraction * 2.0 * PI).min(2.0 * PI - 1e-4);
        let end = start + sweep;
        let large_arc = if sweep > PI { 1 } else { 0 };

        let (ox0, oy0) = point(outer, start);
        let (ox1, oy1) = point(outer, end);
        let (ix1, iy1) = point(inner, end);
        let (ix0, iy0) = point(inner, start);
        let path = format!(
            "M {ox0:.2} {oy0:.2} A {outer:.2} {outer:.2} 0 {large_arc} 1 {ox1:.2} {oy1:.2} \
             L {ix1:.2} {iy1:.2} A {inner:.2} {inner:.2} 0 {large_arc} 0 {ix0:.2} {iy0:.2} Z"
        );

        segments.push(DonutSegment {
            path,
            color: slice.color,
            label: slice.label,
            value: slice.value,
            percent: fraction * 100.0,
        });
        start = end;
    }
    segments
}

/// Contract status distribution
#[component]
pub fn StatusDonut(
    chart: DonutChart,
    /// Diameter in pixels
    #[props(default = 220)]
    size: u32,
) -> Element {
    let segments = donut_segments(&chart, size as f64);
    let total: u64 = chart.slices.iter().map(|s| s.value).sum();
    let center = size as f64 / 2.0;

    rsx! {
        div {
            class: "donut-chart",

            if segments.is_empty() {
                div {
                    class: "chart-empty",
                    style: "width: {size}px; height: {size}px;",
                    "Sem dados"
                }
            } else {
                svg {
                    width: "{size}",
                    height: "{size}",
                    view_box: "0 0 {size} {size}",

                    for segment in segments.iter() {
                        path {
                            d: "{segment.path}",
                            fill: "{segment.color}",
                            stroke: "var(--bg-primary)",
                            stroke_width: "1",
                            title { "{segment.label}: {segment.value} ({segment.percent:.1}%)" }
                        }
                    }

                    text {
                        x: "{center}",
                        y: "{center}",
                        text_anchor: "middle",
                        dominant_baseline: "middle",
                        font_size: "18",
                        font_weight: "bold",
                        fill: "var(--text-primary)",
                        "{total}"
                    }
                }
            }

            ul {
                class: "chart-legend",
                for slice in chart.slices.iter() {
                    li {
                        span {
                            class: "legend-swatch",
                            style: "background: {slice.color};",
                        }
                        "{slice.label} ({slice.value})"
                    }
                }
            }
        }
    }
}

/// Average resolution time per collaborator
#[component]
pub fn ResolutionBars(
    chart: BarChart,
    #[props(default = 520)]
    width: u32,
    #[props(default = 260)]
    height: u32,
) -> Element {
    if chart.bars.is_empty() {
        return rsx! {
            div {
                class: "chart-empty",
                style: "width: {width}px; height: {height}px;",
                "Sem dados"
            }
        };
    }

    let padding_left = 50.0;
    let padding_right = 10.0;
    let padding_top = 15.0;
    let padding_bottom = 60.0;
    let plot_width = width as f64 - padding_left - padding_right;
    let plot_height = height as f64 - padding_top - padding_bottom;

    let max_value = chart
        .bars
        .iter()
        .map(|b| b.value)
        .fold(0.0_f64, f64::max)
        .max(0.001)
        * 1.1;
    let slot = plot_width / chart.bars.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);
    let scale_y = |v: f64| padding_top + (1.0 - v / max_value) * plot_height;
    let baseline = scale_y(0.0);
    let title_y = padding_top + plot_height / 2.0;
    let grid_lines = 4;

    rsx! {
        div {
            class: "bar-chart",

            svg {
                width: "{width}",
                height: "{height}",
                view_box: "0 0 {width} {height}",

                for i in 0..=grid_lines {
                    {
                        let value = max_value * i as f64 / grid_lines as f64;
                        let y = scale_y(value);
                        rsx! {
                            line {
                                x1: "{padding_left}",
                                y1: "{y:.1}",
                                x2: "{width as f64 - padding_right}",
                                y2: "{y:.1}",
                                stroke: "var(--border-color)",
                                stroke_dasharray: "2,2",
                                stroke_width: "1",
                            }
                            text {
                                x: "{padding_left - 5.0}",
                                y: "{y:.1}",
                                text_anchor: "end",
                                dominant_baseline: "middle",
                                font_size: "10",
                                fill: "var(--text-muted)",
                                "{value:.1}"
                            }
                        }
                    }
                }

                for (i, bar) in chart.bars.iter().enumerate() {
                    {
                        let x = padding_left + slot * i as f64 + (slot - bar_width) / 2.0;
                        let top = scale_y(bar.value);
                        let label_x = x + bar_width / 2.0;
                        let label_y = baseline + 12.0;
                        let bar_height = (baseline - top).max(0.0);
                        rsx! {
                            rect {
                                x: "{x:.1}",
                                y: "{top:.1}",
                                width: "{bar_width:.1}",
                                height: "{bar_height:.1}",
                                fill: "{chart.color}",
                                title { "{bar.label}: {bar.value:.1}h" }
                            }
                            text {
                                x: "{label_x:.1}",
                                y: "{label_y:.1}",
                                text_anchor: "end",
                                font_size: "10",
                                fill: "var(--text-secondary)",
                                transform: "rotate(-35 {label_x:.1} {label_y:.1})",
                                "{bar.label}"
                            }
                        }
                    }
                }

                text {
                    x: "12",
                    y: "{title_y:.1}",
                    text_anchor: "middle",
                    font_size: "11",
                    fill: "var(--text-muted)",
                    transform: "rotate(-90 12 {title_y:.1})",
                    "{chart.y_title}"
                }
            }
        }
    }
}
