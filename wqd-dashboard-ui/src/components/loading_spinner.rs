//! Spinner shown until the first reading arrives.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading...".to_string())]
    pub message: String,
}

#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; gap: 12px; padding: 32px; color: #6B7280; font-size: 14px;",
            svg {
                width: "32",
                height: "32",
                view_box: "0 0 32 32",
                circle {
                    cx: "16",
                    cy: "16",
                    r: "12",
                    fill: "none",
                    stroke: "#E5E7EB",
                    stroke_width: "4",
                }
                path {
                    d: "M16 4 a12 12 0 0 1 12 12",
                    fill: "none",
                    stroke: "#4F46E5",
                    stroke_width: "4",
                    stroke_linecap: "round",
                    animateTransform {
                        "attributeName": "transform",
                        "type": "rotate",
                        "from": "0 16 16",
                        "to": "360 16 16",
                        "dur": "0.9s",
                        "repeatCount": "indefinite",
                    }
                }
            }
            "{props.message}"
        }
    }
}
