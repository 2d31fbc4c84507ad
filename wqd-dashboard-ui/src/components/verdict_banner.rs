//! Verdict banner shown once a decision exists.

use dioxus::prelude::*;
use wqd_state::view::VerdictView;

#[derive(Props, Clone, PartialEq)]
pub struct VerdictBannerProps {
    pub verdict: VerdictView,
}

#[component]
pub fn VerdictBanner(props: VerdictBannerProps) -> Element {
    let verdict = &props.verdict;
    let tier = verdict.tier;
    let banner_style = format!(
        "margin-bottom: 24px; padding: 24px; border-radius: 16px; background: {}; border: 2px solid {}; display: flex; align-items: center; justify-content: space-between;",
        tier.background(),
        tier.accent()
    );
    let icon_style = format!(
        "width: 72px; height: 72px; border-radius: 9999px; background: {}; color: #fff; display: flex; align-items: center; justify-content: center; font-size: 36px; font-weight: 700;",
        tier.accent()
    );
    let title_style = format!(
        "margin: 0; font-size: 28px; font-weight: 700; color: {};",
        tier.foreground()
    );
    let subtitle_style = format!("margin: 4px 0 0 0; font-size: 18px; color: {};", tier.foreground());
    let severity_style = tier.badge_style();
    let symbol = tier.symbol();
    let severity_label = verdict.label();

    rsx! {
        div {
            style: "{banner_style}",
            div {
                style: "display: flex; align-items: center; gap: 16px;",
                div {
                    style: "{icon_style}",
                    "{symbol}"
                }
                div {
                    h2 { style: "{title_style}", "{verdict.title}" }
                    p { style: "{subtitle_style}", "{verdict.subtitle}" }
                    if let Some(line) = verdict.coliform_line.as_ref() {
                        p {
                            style: "margin: 8px 0 0 0; font-size: 14px; color: #4B5563;",
                            "{line}"
                        }
                    }
                }
            }
            span {
                style: "{severity_style}",
                "{severity_label}"
            }
        }
    }
}
