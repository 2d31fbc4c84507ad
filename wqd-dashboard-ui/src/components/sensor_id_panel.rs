//! Hardware sensor identifiers reported with the latest upload.

use dioxus::prelude::*;
use wqd_state::view::SensorIdRow;

#[derive(Props, Clone, PartialEq)]
pub struct SensorIdPanelProps {
    pub rows: Vec<SensorIdRow>,
}

#[component]
pub fn SensorIdPanel(props: SensorIdPanelProps) -> Element {
    if props.rows.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            style: super::PANEL_STYLE,
            div {
                style: "color: #374151; font-weight: 600; margin-bottom: 8px;",
                "Sensor IDs"
            }
            dl {
                style: "display: grid; grid-template-columns: auto 1fr; gap: 4px 12px; margin: 0; font-size: 13px;",
                for row in props.rows.iter() {
                    div {
                        key: "{row.label}",
                        style: "display: contents;",
                        dt { style: "color: #6B7280;", "{row.label}" }
                        dd { style: "margin: 0; font-family: monospace;", "{row.id}" }
                    }
                }
            }
        }
    }
}
