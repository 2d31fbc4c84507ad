//! One-shot commands: latest, history, predict, clear and health.

use crate::render::{self, RenderOptions};
use anyhow::{bail, Context};
use chrono::Utc;
use log::info;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use wqd_core::api::ApiClient;
use wqd_core::config::DashboardConfig;
use wqd_core::model::SensorReading;
use wqd_state::refresh::{RefreshController, SharedState, StateHandle};
use wqd_state::store::ViewState;
use wqd_state::view;

pub type CliController = RefreshController<ApiClient, SharedState>;

/// Controller over a fresh, empty store.
pub fn controller(config: &DashboardConfig) -> anyhow::Result<CliController> {
    let api = ApiClient::new(config).context("failed to build HTTP client")?;
    let state: SharedState = Rc::new(RefCell::new(ViewState::new()));
    Ok(RefreshController::new(api, state, config))
}

/// Fail the command when the controller recorded an error, after the
/// output has been printed.
fn check_error(ctl: &CliController) -> anyhow::Result<()> {
    match ctl.state().read(|s| s.error.clone()) {
        Some(error) => bail!(error),
        None => Ok(()),
    }
}

pub async fn run_latest(config: &DashboardConfig, color: bool, table: bool) -> anyhow::Result<()> {
    info!("Fetching latest reading from {}", config.api_base);
    let ctl = controller(config)?;
    if table {
        ctl.run_cycle().await;
    } else {
        ctl.refresh_latest().await;
        ctl.state().update(|s| s.finish_cycle(Utc::now()));
    }

    let output = ctl
        .state()
        .read(|s| render::render_dashboard(s, config, RenderOptions { color, table }));
    println!("{}", output);
    check_error(&ctl)
}

pub async fn run_history(
    config: &DashboardConfig,
    color: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(limit) = limit {
        config.history_limit = limit;
    }
    info!("Fetching up to {} history rows", config.history_limit);

    let ctl = controller(&config)?;
    ctl.refresh_history().await;

    let offset = config.display_offset();
    let output = ctl.state().read(|s| {
        let rows = view::history_table(&s.rows, config.coliform_unit, &offset);
        render::render_history(&rows, &config, color)
    });
    println!("{}", output);
    check_error(&ctl)
}

/// A hand-entered reading with the coliform value in the configured unit's
/// field.
pub fn manual_reading(
    config: &DashboardConfig,
    temp_c: f64,
    do_mgl: f64,
    ph: f64,
    conductivity_uscm: f64,
    coliform: Option<f64>,
) -> SensorReading {
    let (coliform_raw, coliform_converted) = config.coliform_unit.slots(coliform);
    SensorReading {
        temp_c,
        do_mgl,
        ph,
        conductivity_uscm,
        coliform_raw,
        coliform_converted,
        timestamp: None,
    }
}

pub async fn run_predict(
    config: &DashboardConfig,
    color: bool,
    reading: SensorReading,
) -> anyhow::Result<()> {
    let ctl = controller(config)?;
    ctl.predict_manual(reading)
        .await
        .context("prediction request failed")?;

    let output = ctl
        .state()
        .read(|s| render::render_dashboard(s, config, RenderOptions { color, table: false }));
    println!("{}", output);
    Ok(())
}

/// True for "y" or "yes", any case.
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmed(&answer))
}

pub async fn run_clear(config: &DashboardConfig, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm("Permanently delete every stored sensor reading?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let ctl = controller(config)?;
    let deleted = ctl
        .clear_history()
        .await
        .context("failed to clear history")?;
    println!("History cleared: {} records deleted.", deleted);
    Ok(())
}

pub async fn run_health(config: &DashboardConfig) -> anyhow::Result<()> {
    let api = ApiClient::new(config).context("failed to build HTTP client")?;
    if api.health().await.context("health check failed")? {
        println!("{}: ok", api.base_url());
        Ok(())
    } else {
        bail!("{} did not report ok", api.base_url())
    }
}
