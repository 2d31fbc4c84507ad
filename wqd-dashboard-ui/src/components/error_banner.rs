//! The single visible error string, with a dismiss control.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    /// Clears the error in the store
    pub on_dismiss: EventHandler<()>,
}

#[component]
pub fn ErrorBanner(props: ErrorBannerProps) -> Element {
    let on_dismiss = props.on_dismiss;

    rsx! {
        div {
            role: "alert",
            style: "display: flex; align-items: flex-start; justify-content: space-between; gap: 12px; padding: 12px 16px; margin-bottom: 16px; background: #FEF2F2; color: #B91C1C; border-radius: 12px; border: 1px solid #FECACA;",
            div {
                strong { "Something went wrong: " }
                "{props.message}"
            }
            button {
                style: "border: none; background: transparent; color: #B91C1C; cursor: pointer; font-size: 16px; line-height: 1;",
                title: "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
