//! Water Quality Dashboard
//!
//! Shows the latest IoT sensor upload, the prediction service's coliform
//! estimate with its CI90 band, and the potability verdict.
//!
//! Data flow:
//! 1. On mount: run one refresh cycle (latest → predict → history → per-row predict).
//! 2. A component-scoped task re-runs the cycle every `refresh_interval`
//!    (one hour by default). It is dropped with the component.
//! 3. The refresh controller writes into the `ViewState` signal; every panel
//!    is derived from it through `wqd_state::view`.
//! 4. Manual predictions and history clears go through the same controller.

use dioxus::prelude::*;
use log::{error, info};
use serde_json::json;
use wqd_core::api::ApiClient;
use wqd_core::config::{
    DashboardConfig, ENV_API_BASE, ENV_COLIFORM_UNIT, ENV_HISTORY_LIMIT, ENV_REFRESH_SECS,
    ENV_SEND_COLIFORM, ENV_UTC_OFFSET_MINUTES,
};
use wqd_core::model::SensorReading;
use wqd_dashboard_ui::components::{
    ConfirmModal, DetectionPanel, ErrorBanner, Gauge, HistoryTable, KpiCard, LoadingSpinner,
    PredictForm, PredictionChart, ResultModal, SensorIdPanel, VerdictBanner,
};
use wqd_dashboard_ui::js_bridge;
use wqd_dashboard_ui::state::{AppState, StoreHandle};
use wqd_state::refresh::{CycleOutcome, RefreshController};
use wqd_state::view;
use wqd_utils::dates;

/// DOM id for the D3 chart container div.
const CHART_CONTAINER_ID: &str = "prediction-band-chart";

type Controller = RefreshController<ApiClient, StoreHandle>;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("main"))
        .launch(App);
}

/// Configuration baked in at build time from `WQD_*` variables.
fn build_config() -> DashboardConfig {
    DashboardConfig::from_lookup(|key| {
        let value = match key {
            ENV_API_BASE => option_env!("WQD_API_BASE"),
            ENV_REFRESH_SECS => option_env!("WQD_REFRESH_SECS"),
            ENV_HISTORY_LIMIT => option_env!("WQD_HISTORY_LIMIT"),
            ENV_COLIFORM_UNIT => option_env!("WQD_COLIFORM_UNIT"),
            ENV_SEND_COLIFORM => option_env!("WQD_SEND_COLIFORM"),
            ENV_UTC_OFFSET_MINUTES => option_env!("WQD_UTC_OFFSET_MINUTES"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

fn spawn_cycle(controller: &Controller) {
    let controller = controller.clone();
    spawn(async move {
        if controller.run_cycle().await == CycleOutcome::Skipped {
            info!("Refresh requested while a cycle is running; skipped");
        }
    });
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(|| AppState::new(build_config()));

    let controller: Option<Controller> = use_hook(move || {
        let config = state.config.peek().clone();
        match ApiClient::new(&config) {
            Ok(api) => {
                info!("Dashboard polling {} every {:?}", config.api_base, config.refresh_interval);
                Some(RefreshController::new(api, state.handle(), &config))
            }
            Err(e) => {
                error!("Failed to build API client: {}", e);
                None
            }
        }
    });

    // ─── Effect 1: one-time setup on mount ───
    use_effect({
        let controller = controller.clone();
        move || {
            js_bridge::init_charts();
            match controller.as_ref() {
                Some(ctl) => spawn_cycle(ctl),
                None => state
                    .store
                    .write()
                    .set_error("API client could not be created; check WQD_API_BASE."),
            }
        }
    });

    // ─── Periodic refresh, cancelled when the component unmounts ───
    use_future({
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            async move {
                let Some(ctl) = controller else { return };
                let period = state.config.peek().refresh_interval;
                let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
                loop {
                    gloo_timers::future::TimeoutFuture::new(millis).await;
                    spawn_cycle(&ctl);
                }
            }
        }
    });

    // ─── Effect 2: redraw the band chart whenever the chart buffer changes ───
    let chart_json = use_memo(move || {
        let store = state.store.read();
        let unit = view::chart_unit(&store.chart, state.config.read().coliform_unit);
        let config_json = json!({
            "yAxisLabel": unit.unit_label(),
            "color": "#3B82F6",
            "bandColor": "rgba(59, 130, 246, 0.18)",
            "safeLimit": view::safe_limit(unit),
        })
        .to_string();
        (view::chart_series_json(&store.chart), config_json)
    });
    use_effect(move || {
        let (data_json, config_json) = chart_json();
        js_bridge::render_band_chart(CHART_CONTAINER_ID, &data_json, &config_json);
    });

    use_drop(|| js_bridge::destroy_chart(CHART_CONTAINER_ID));

    // ─── Handlers ───
    let on_refresh = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            if let Some(ctl) = controller.as_ref() {
                spawn_cycle(ctl);
            }
        }
    };

    let on_confirm_clear = {
        let controller = controller.clone();
        move |_: ()| {
            state.show_confirm.set(false);
            let Some(ctl) = controller.clone() else { return };
            spawn(async move {
                let message = match ctl.clear_history().await {
                    Ok(deleted) => format!("History cleared: {} records deleted.", deleted),
                    Err(e) => format!("Failed to clear history: {}", e),
                };
                state.result_message.set(Some(message));
            });
        }
    };

    let on_manual_predict = {
        let controller = controller.clone();
        move |reading: SensorReading| {
            let Some(ctl) = controller.clone() else { return };
            spawn(async move {
                // Failures are already in the store's error string.
                let _ = ctl.predict_manual(reading).await;
            });
        }
    };

    // ─── Derived view models ───
    let config = state.config.read().clone();
    let offset = config.display_offset();
    let store = state.store.read();
    let cards = view::kpi_cards(&store, config.coliform_unit);
    let gauge = view::gauge(&store);
    let verdict = view::verdict(&store);
    let detection = view::detection(&store);
    let sensor_rows = view::sensor_id_rows(&store);
    let table_rows = view::history_table(&store.rows, config.coliform_unit, &offset);
    let last_updated = view::last_updated_text(&store, &offset);
    let error_msg = store.error.clone();
    let loading = store.loading;
    let chart_points = store.chart.len();
    let chart_capacity = store.chart.capacity();
    let chart_unit = view::chart_unit(&store.chart, config.coliform_unit);
    let first_load = loading && store.last_updated.is_none() && store.reading.is_none();
    drop(store);

    let table_caption = format!("Times shown in {}", dates::format_offset(&offset));

    rsx! {
        div {
            style: "min-height: 100vh; background: #F9FAFB; color: #111827; font-family: system-ui, -apple-system, sans-serif;",
            div {
                style: "max-width: 1200px; margin: 0 auto; padding: 24px;",

                header {
                    style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px;",
                    div {
                        h1 { style: "margin: 0; font-size: 24px; font-weight: 700;", "Water Quality Dashboard" }
                        if let Some(text) = last_updated.as_ref() {
                            div { style: "font-size: 12px; color: #6B7280;", "{text}" }
                        }
                    }
                    button {
                        style: "padding: 8px 14px; border-radius: 12px; border: 1px solid #C7D2FE; background: #EEF2FF; color: #4338CA; cursor: pointer;",
                        disabled: loading,
                        onclick: on_refresh,
                        if loading { "Refreshing..." } else { "Refresh now" }
                    }
                }

                if let Some(err) = error_msg {
                    ErrorBanner {
                        message: err,
                        on_dismiss: move |_| state.store.write().clear_error(),
                    }
                }

                PredictForm { on_submit: on_manual_predict, busy: loading }

                if first_load {
                    LoadingSpinner { message: "Fetching the latest sensor upload...".to_string() }
                }

                if let Some(verdict) = verdict {
                    VerdictBanner { verdict }
                }

                div {
                    style: "display: grid; grid-template-columns: repeat(auto-fit, minmax(170px, 1fr)); gap: 16px; margin-bottom: 24px;",
                    for card in cards {
                        KpiCard { key: "{card.key}", card }
                    }
                    Gauge { gauge }
                }

                div {
                    style: "display: grid; grid-template-columns: 2fr 1fr; gap: 24px; margin-bottom: 24px;",
                    PredictionChart {
                        id: CHART_CONTAINER_ID.to_string(),
                        points: chart_points,
                        capacity: chart_capacity,
                        unit: chart_unit,
                        loading,
                    }
                    div {
                        style: "display: flex; flex-direction: column; gap: 24px;",
                        DetectionPanel { detection }
                        SensorIdPanel { rows: sensor_rows }
                    }
                }

                HistoryTable {
                    rows: table_rows,
                    coliform_unit: config.coliform_unit.unit_label().to_string(),
                    caption: table_caption,
                    busy: loading,
                    on_clear: move |_| state.show_confirm.set(true),
                }
            }

            ConfirmModal {
                open: (state.show_confirm)(),
                title: "Clear history?".to_string(),
                message: "This permanently deletes every stored sensor reading on the server.".to_string(),
                on_confirm: on_confirm_clear,
                on_cancel: move |_| state.show_confirm.set(false),
            }

            ResultModal {
                message: (state.result_message)(),
                on_close: move |_| state.result_message.set(None),
            }
        }
    }
}
