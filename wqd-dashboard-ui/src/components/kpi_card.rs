//! KPI card for one sensor parameter.

use dioxus::prelude::*;
use wqd_state::view::KpiCardView;

#[derive(Props, Clone, PartialEq)]
pub struct KpiCardProps {
    pub card: KpiCardView,
}

/// Value, unit and the backend's badge for one parameter.
#[component]
pub fn KpiCard(props: KpiCardProps) -> Element {
    let card = &props.card;
    let badge_style = card.tier.badge_style();

    rsx! {
        div {
            style: super::PANEL_STYLE,
            div {
                style: "color: #6B7280; font-size: 14px; margin-bottom: 4px;",
                "{card.title}"
            }
            div {
                style: "font-size: 24px; font-weight: 600;",
                "{card.value} "
                span {
                    style: "font-size: 16px; color: #6B7280;",
                    "{card.unit}"
                }
            }
            span {
                style: "{badge_style}",
                "{card.badge.label}"
            }
        }
    }
}
