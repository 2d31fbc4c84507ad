//! Result-notification modal.

use super::confirm_modal::{DIALOG_STYLE, OVERLAY_STYLE};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ResultModalProps {
    /// The modal is open while a message is set
    #[props(!optional)]
    pub message: Option<String>,
    pub on_close: EventHandler<()>,
}

#[component]
pub fn ResultModal(props: ResultModalProps) -> Element {
    let Some(message) = props.message.clone() else {
        return rsx! {};
    };
    let on_close = props.on_close;

    rsx! {
        div {
            style: OVERLAY_STYLE,
            onclick: move |_| on_close.call(()),
            div {
                role: "dialog",
                style: DIALOG_STYLE,
                onclick: move |evt| evt.stop_propagation(),
                p { style: "margin: 0 0 20px 0; color: #111827;", "{message}" }
                div {
                    style: "display: flex; justify-content: flex-end;",
                    button {
                        style: "padding: 8px 14px; border-radius: 8px; border: none; background: #4F46E5; color: #fff; cursor: pointer;",
                        onclick: move |_| on_close.call(()),
                        "OK"
                    }
                }
            }
        }
    }
}
