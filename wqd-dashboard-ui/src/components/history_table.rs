//! History table of stored readings with their per-row predictions.
//!
//! Sticky header and zebra rows, inline styles only.

use dioxus::prelude::*;
use wqd_state::view::{HistoryTableRow, HISTORY_COLUMNS};

#[derive(Props, Clone, PartialEq)]
pub struct HistoryTableProps {
    pub rows: Vec<HistoryTableRow>,
    /// Unit of the measured coliform column ("mV" or "MPN/100mL")
    pub coliform_unit: String,
    /// Caption under the title, e.g. the display offset
    #[props(default = String::new())]
    pub caption: String,
    pub on_clear: EventHandler<()>,
    #[props(default = false)]
    pub busy: bool,
}

#[component]
pub fn HistoryTable(props: HistoryTableProps) -> Element {
    let th_style = "padding: 8px; text-align: left; font-size: 12px; color: #6B7280; border-bottom: 1px solid #E5E7EB; position: sticky; top: 0; background: #F9FAFB;";
    let td_style = "padding: 6px 8px; font-size: 13px; border-bottom: 1px solid #F3F4F6; white-space: nowrap;";
    let row_count = props.rows.len();
    let on_clear = props.on_clear;
    let clear_disabled = props.busy || props.rows.is_empty();

    rsx! {
        div {
            style: super::PANEL_STYLE,
            div {
                style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px;",
                div {
                    div {
                        style: "color: #374151; font-weight: 600;",
                        "History ({row_count} rows)"
                    }
                    if !props.caption.is_empty() {
                        div { style: "font-size: 12px; color: #6B7280;", "{props.caption}" }
                    }
                }
                button {
                    style: "padding: 6px 12px; border-radius: 8px; border: 1px solid #FCA5A5; background: #FEF2F2; color: #B91C1C; cursor: pointer;",
                    disabled: clear_disabled,
                    onclick: move |_| on_clear.call(()),
                    "Clear history"
                }
            }
            if props.rows.is_empty() {
                div {
                    style: "padding: 16px; color: #6B7280; font-size: 14px;",
                    "No stored readings."
                }
            } else {
                div {
                    style: "max-height: 420px; overflow: auto;",
                    table {
                        style: "width: 100%; border-collapse: collapse;",
                        thead {
                            tr {
                                for (i, col) in HISTORY_COLUMNS.iter().enumerate() {
                                    th {
                                        key: "{i}",
                                        style: th_style,
                                        if *col == "Coliform" {
                                            "Coliform ({props.coliform_unit})"
                                        } else {
                                            "{col}"
                                        }
                                    }
                                }
                            }
                        }
                        tbody {
                            for (i, row) in props.rows.iter().enumerate() {
                                HistoryRowView {
                                    key: "{i}",
                                    row: row.clone(),
                                    striped: i % 2 == 1,
                                    td_style: td_style.to_string(),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct HistoryRowViewProps {
    row: HistoryTableRow,
    striped: bool,
    td_style: String,
}

#[component]
fn HistoryRowView(props: HistoryRowViewProps) -> Element {
    let row = &props.row;
    let background = if props.striped { "#F9FAFB" } else { "#FFFFFF" };
    let verdict_style = row.tier.badge_style();
    let verdict = row.verdict_text();
    let td = props.td_style.as_str();

    rsx! {
        tr {
            style: "background: {background};",
            td { style: td, "{row.timestamp}" }
            td { style: td, "{row.temp_c}" }
            td { style: td, "{row.do_mgl}" }
            td { style: td, "{row.ph}" }
            td { style: td, "{row.conductivity}" }
            td { style: td, "{row.coliform}" }
            td { style: td, "{row.predicted}" }
            td { style: td, "{row.interval}" }
            td {
                style: td,
                span { style: "{verdict_style}", "{verdict}" }
            }
        }
    }
}
