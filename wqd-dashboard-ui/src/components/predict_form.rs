//! Manual prediction form.

use crate::state::AppState;
use dioxus::prelude::*;
use wqd_core::model::SensorReading;

const FIELD_STYLE: &str =
    "background: #fff; border: 1px solid #F3F4F6; border-radius: 16px; padding: 16px;";
const LABEL_STYLE: &str = "display: block; font-size: 12px; color: #6B7280; margin-bottom: 4px;";
const INPUT_STYLE: &str =
    "width: 100%; box-sizing: border-box; padding: 6px 8px; border-radius: 8px; border: 1px solid #E5E7EB;";

#[derive(Props, Clone, PartialEq)]
pub struct PredictFormProps {
    /// Called with the parsed reading when the form is submitted
    pub on_submit: EventHandler<SensorReading>,
    #[props(default = false)]
    pub busy: bool,
}

/// Four physico-chemical inputs plus the optional measured coliform.
#[component]
pub fn PredictForm(props: PredictFormProps) -> Element {
    let mut state = use_context::<AppState>();
    let form = state.form.read().clone();
    let unit = state.config.read().coliform_unit;
    let coliform_label = format!("Measured total coliform, {} (optional)", unit.unit_label());
    let on_submit = props.on_submit;

    let submit = move |_: MouseEvent| {
        let parsed = state.form.read().to_reading(unit);
        match parsed {
            Ok(reading) => {
                state.form_error.set(None);
                on_submit.call(reading);
            }
            Err(msg) => state.form_error.set(Some(msg)),
        }
    };

    rsx! {
        div {
            style: "display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 16px; margin-bottom: 16px;",
            div {
                style: FIELD_STYLE,
                label { style: LABEL_STYLE, "Temperature (°C)" }
                input {
                    r#type: "number",
                    step: "0.1",
                    style: INPUT_STYLE,
                    value: "{form.temp_c}",
                    oninput: move |evt: Event<FormData>| state.form.write().temp_c = evt.value(),
                }
            }
            div {
                style: FIELD_STYLE,
                label { style: LABEL_STYLE, "Dissolved Oxygen (mg/L)" }
                input {
                    r#type: "number",
                    step: "0.1",
                    style: INPUT_STYLE,
                    value: "{form.do_mgl}",
                    oninput: move |evt: Event<FormData>| state.form.write().do_mgl = evt.value(),
                }
            }
            div {
                style: FIELD_STYLE,
                label { style: LABEL_STYLE, "pH" }
                input {
                    r#type: "number",
                    step: "0.01",
                    style: INPUT_STYLE,
                    value: "{form.ph}",
                    oninput: move |evt: Event<FormData>| state.form.write().ph = evt.value(),
                }
            }
            div {
                style: FIELD_STYLE,
                label { style: LABEL_STYLE, "Conductivity (µS/cm)" }
                input {
                    r#type: "number",
                    step: "1",
                    style: INPUT_STYLE,
                    value: "{form.conductivity_uscm}",
                    oninput: move |evt: Event<FormData>| state.form.write().conductivity_uscm = evt.value(),
                }
            }
            div {
                style: FIELD_STYLE,
                label {
                    style: "display: flex; align-items: center; gap: 8px; font-size: 12px; color: #6B7280; margin-bottom: 4px;",
                    input {
                        r#type: "checkbox",
                        checked: form.use_measured_coliform,
                        onchange: move |evt: Event<FormData>| state.form.write().use_measured_coliform = evt.checked(),
                    }
                    "{coliform_label}"
                }
                input {
                    r#type: "number",
                    step: "0.1",
                    style: INPUT_STYLE,
                    disabled: !form.use_measured_coliform,
                    value: "{form.coliform}",
                    oninput: move |evt: Event<FormData>| state.form.write().coliform = evt.value(),
                }
            }
        }
        div {
            style: "display: flex; align-items: center; gap: 12px; margin-bottom: 24px;",
            button {
                style: "padding: 8px 16px; border-radius: 12px; border: none; background: #4F46E5; color: #fff; cursor: pointer;",
                disabled: props.busy,
                onclick: submit,
                if props.busy { "Processing..." } else { "Predict & Evaluate" }
            }
            if let Some(err) = state.form_error.read().as_ref() {
                span { style: "color: #DC2626; font-size: 14px;", "{err}" }
            }
        }
    }
}
