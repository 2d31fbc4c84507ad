//! Reasons / recommendations / alternative-use panel.

use dioxus::prelude::*;
use wqd_state::view::{DetectionView, AWAITING_RESULT_TEXT};

#[derive(Props, Clone, PartialEq)]
pub struct DetectionPanelProps {
    /// None until the first decision arrives
    #[props(!optional)]
    pub detection: Option<DetectionView>,
}

#[component]
pub fn DetectionPanel(props: DetectionPanelProps) -> Element {
    rsx! {
        div {
            style: super::PANEL_STYLE,
            div {
                style: "color: #374151; font-weight: 600; margin-bottom: 8px;",
                "AI Detection: Summary"
            }
            if let Some(detection) = props.detection.as_ref() {
                div {
                    style: "display: flex; flex-direction: column; gap: 16px; font-size: 14px;",
                    Section {
                        title: "Reasons / Findings".to_string(),
                        items: detection.reasons.clone(),
                        empty_text: detection.reasons_empty_text().map(str::to_string),
                        empty_color: "#16A34A".to_string(),
                    }
                    Section {
                        title: "Recommendations".to_string(),
                        items: detection.recommendations.clone(),
                        empty_text: detection.recommendations_empty_text().map(str::to_string),
                    }
                    Section {
                        title: "Alternative Use".to_string(),
                        items: detection.alternative_use.clone(),
                        empty_text: None,
                    }
                    div {
                        style: "font-size: 12px; color: #9CA3AF;",
                        "{detection.disclaimer}"
                    }
                }
            } else {
                div {
                    style: "color: #6B7280; font-size: 14px;",
                    "{AWAITING_RESULT_TEXT}"
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct SectionProps {
    title: String,
    items: Vec<String>,
    /// Shown instead of the list when `items` is empty
    #[props(!optional)]
    empty_text: Option<String>,
    #[props(default = "#6B7280".to_string())]
    empty_color: String,
}

#[component]
fn Section(props: SectionProps) -> Element {
    let empty_style = format!("color: {};", props.empty_color);
    rsx! {
        div {
            div { style: "color: #6B7280; margin-bottom: 4px;", "{props.title}" }
            if props.items.is_empty() {
                if let Some(text) = props.empty_text.as_ref() {
                    div { style: "{empty_style}", "{text}" }
                }
            } else {
                ul {
                    style: "margin: 0; padding-left: 20px;",
                    for (i, item) in props.items.iter().enumerate() {
                        li { key: "{i}", "{item}" }
                    }
                }
            }
        }
    }
}
