//! Delete-confirmation modal.

use dioxus::prelude::*;

pub(crate) const OVERLAY_STYLE: &str =
    "position: fixed; inset: 0; background: rgba(17,24,39,0.45); display: flex; align-items: center; justify-content: center; z-index: 50;";
pub(crate) const DIALOG_STYLE: &str =
    "background: #fff; border-radius: 16px; padding: 24px; max-width: 420px; width: 90%; box-shadow: 0 10px 25px rgba(0,0,0,0.2);";

#[derive(Props, Clone, PartialEq)]
pub struct ConfirmModalProps {
    pub open: bool,
    pub title: String,
    pub message: String,
    #[props(default = "Delete".to_string())]
    pub confirm_label: String,
    pub on_confirm: EventHandler<()>,
    pub on_cancel: EventHandler<()>,
}

/// Asks before an irreversible action. Renders nothing while closed.
#[component]
pub fn ConfirmModal(props: ConfirmModalProps) -> Element {
    if !props.open {
        return rsx! {};
    }
    let on_confirm = props.on_confirm;
    let on_cancel = props.on_cancel;

    rsx! {
        div {
            style: OVERLAY_STYLE,
            onclick: move |_| on_cancel.call(()),
            div {
                role: "dialog",
                style: DIALOG_STYLE,
                onclick: move |evt| evt.stop_propagation(),
                h3 { style: "margin: 0 0 8px 0; font-size: 18px;", "{props.title}" }
                p { style: "margin: 0 0 20px 0; color: #4B5563;", "{props.message}" }
                div {
                    style: "display: flex; justify-content: flex-end; gap: 8px;",
                    button {
                        style: "padding: 8px 14px; border-radius: 8px; border: 1px solid #D1D5DB; background: #fff; cursor: pointer;",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        style: "padding: 8px 14px; border-radius: 8px; border: none; background: #DC2626; color: #fff; cursor: pointer;",
                        onclick: move |_| on_confirm.call(()),
                        "{props.confirm_label}"
                    }
                }
            }
        }
    }
}
