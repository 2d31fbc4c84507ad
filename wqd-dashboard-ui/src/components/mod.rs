//! Dioxus RSX components for the water quality dashboard.

mod confirm_modal;
mod detection_panel;
mod error_banner;
mod gauge;
mod history_table;
mod kpi_card;
mod loading_spinner;
mod predict_form;
mod prediction_chart;
mod result_modal;
mod sensor_id_panel;
mod verdict_banner;

pub use confirm_modal::ConfirmModal;
pub use detection_panel::DetectionPanel;
pub use error_banner::ErrorBanner;
pub use gauge::Gauge;
pub use history_table::HistoryTable;
pub use kpi_card::KpiCard;
pub use loading_spinner::LoadingSpinner;
pub use predict_form::PredictForm;
pub use prediction_chart::PredictionChart;
pub use result_modal::ResultModal;
pub use sensor_id_panel::SensorIdPanel;
pub use verdict_banner::VerdictBanner;

/// Card chrome shared by the dashboard panels.
pub(crate) const PANEL_STYLE: &str =
    "background: #fff; border: 1px solid #F3F4F6; border-radius: 16px; padding: 16px; box-shadow: 0 1px 2px rgba(0,0,0,0.05);";
