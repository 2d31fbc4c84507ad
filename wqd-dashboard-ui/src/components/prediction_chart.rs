//! Panel hosting the D3 confidence-band chart.
//!
//! Only the chrome is rendered here. The SVG is drawn into the inner div by
//! `js_bridge::render_band_chart`, so the div must keep its `id` across
//! re-renders.

use super::PANEL_STYLE;
use dioxus::prelude::*;
use wqd_core::config::ColiformUnit;
use wqd_state::view::safe_limit;
use wqd_utils::numbers::format_number;

#[derive(Props, Clone, PartialEq)]
pub struct PredictionChartProps {
    /// DOM id D3 renders into
    pub id: String,
    /// Number of points currently buffered
    pub points: usize,
    /// Buffer capacity, shown next to the point count
    pub capacity: usize,
    /// Unit of the plotted estimates
    #[props(default)]
    pub unit: ColiformUnit,
    #[props(default = false)]
    pub loading: bool,
    #[props(default = 260)]
    pub min_height: u32,
}

#[component]
fn LegendSwatch(swatch: String, label: String) -> Element {
    rsx! {
        span {
            style: "display: inline-flex; align-items: center; gap: 6px;",
            span { style: "{swatch}" }
            "{label}"
        }
    }
}

#[component]
pub fn PredictionChart(props: PredictionChartProps) -> Element {
    let body_style = format!(
        "min-height: {}px; position: relative; width: 100%;",
        props.min_height
    );
    let unit = props.unit.unit_label();
    let limit_label =
        safe_limit(props.unit).map(|l| format!("Safe limit {} {}", format_number(l), unit));
    let subtitle = format!("Total coliform ({}), AI estimate from four parameters", unit);
    let count = format!("{} / {} points", props.points, props.capacity);

    rsx! {
        section {
            style: PANEL_STYLE,
            div {
                style: "display: flex; align-items: baseline; justify-content: space-between; margin-bottom: 8px;",
                div {
                    h3 {
                        style: "margin: 0 0 4px 0; font-size: 16px; color: #374151;",
                        "Microbial Prediction (proxy)"
                    }
                    p {
                        style: "margin: 0; font-size: 12px; color: #6B7280;",
                        "{subtitle}"
                    }
                }
                span { style: "font-size: 12px; color: #9CA3AF;", "{count}" }
            }
            div {
                style: "display: flex; gap: 16px; font-size: 12px; color: #4B5563; margin-bottom: 8px;",
                LegendSwatch {
                    swatch: "width: 16px; height: 2px; background: #3B82F6;".to_string(),
                    label: "Predicted".to_string(),
                }
                LegendSwatch {
                    swatch: "width: 16px; height: 10px; background: rgba(59, 130, 246, 0.18);".to_string(),
                    label: "CI90 band".to_string(),
                }
                if let Some(label) = limit_label {
                    LegendSwatch {
                        swatch: "width: 16px; border-top: 2px dotted #22C55E;".to_string(),
                        label,
                    }
                }
            }
            div {
                style: "{body_style}",
                if props.loading {
                    div {
                        style: "position: absolute; top: 8px; right: 8px; font-size: 12px; color: #666;",
                        "Refreshing..."
                    }
                }
                div { id: "{props.id}", style: "width: 100%;" }
            }
        }
    }
}
