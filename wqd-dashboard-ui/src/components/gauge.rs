//! Semicircle potability gauge.
//!
//! Drawn as an SVG arc with the stroke-dasharray technique: the background
//! arc shows the full half circle, the filled arc draws `value`% of it.

use dioxus::prelude::*;
use std::f64::consts::PI;
use wqd_state::view::GaugeView;

const RADIUS: f64 = 50.0;
const STROKE_WIDTH: f64 = 12.0;

#[derive(Props, Clone, PartialEq)]
pub struct GaugeProps {
    pub gauge: GaugeView,
}

#[component]
pub fn Gauge(props: GaugeProps) -> Element {
    let gauge = &props.gauge;
    let arc_length = PI * RADIUS;
    let filled = arc_length * f64::from(gauge.value.min(100)) / 100.0;
    let fill_dasharray = format!("{:.2} {:.2}", filled, arc_length);
    let arc = format!(
        "M {l} {c} A {r} {r} 0 0 1 {rt} {c}",
        l = STROKE_WIDTH / 2.0,
        rt = STROKE_WIDTH / 2.0 + 2.0 * RADIUS,
        r = RADIUS,
        c = RADIUS + STROKE_WIDTH / 2.0,
    );
    let width = 2.0 * RADIUS + STROKE_WIDTH;
    let height = RADIUS + STROKE_WIDTH;
    let view_box = format!("0 0 {} {}", width, height);
    let center_x = width / 2.0;
    let text_y = height - 4.0;
    let value = gauge.value;
    let label_style = format!(
        "text-align: center; font-size: 18px; font-weight: 700; color: {};",
        gauge.tier.foreground()
    );

    rsx! {
        div {
            style: super::PANEL_STYLE,
            div {
                style: "color: #6B7280; font-size: 14px; margin-bottom: 8px;",
                "Potability Status"
            }
            svg {
                width: "100%",
                height: "120",
                view_box: "{view_box}",
                path {
                    d: "{arc}",
                    fill: "none",
                    stroke: "#E5E7EB",
                    stroke_width: "{STROKE_WIDTH}",
                    stroke_linecap: "round",
                }
                if gauge.value > 0 {
                    path {
                        d: "{arc}",
                        fill: "none",
                        stroke: gauge.tier.accent(),
                        stroke_width: "{STROKE_WIDTH}",
                        stroke_linecap: "round",
                        stroke_dasharray: "{fill_dasharray}",
                    }
                }
                text {
                    x: "{center_x}",
                    y: "{text_y}",
                    text_anchor: "middle",
                    font_size: "16",
                    fill: "#374151",
                    "{value}%"
                }
            }
            div {
                style: "{label_style}",
                "{gauge.label}"
            }
        }
    }
}
