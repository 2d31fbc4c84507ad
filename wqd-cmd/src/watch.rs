//! Terminal watch mode: the dashboard's periodic refresh, printed to stdout.

use crate::query::controller;
use crate::render::{self, RenderOptions};
use anyhow::bail;
use log::{info, warn};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use wqd_core::config::DashboardConfig;
use wqd_state::refresh::{CycleOutcome, StateHandle};

/// Cycle period: `--interval` seconds when given, else the configured
/// refresh interval.
pub fn watch_period(config: &DashboardConfig, interval_secs: Option<u64>) -> anyhow::Result<Duration> {
    let period = interval_secs
        .map(Duration::from_secs)
        .unwrap_or(config.refresh_interval);
    if period.is_zero() {
        bail!("watch interval must be at least one second");
    }
    Ok(period)
}

fn limit_reached(completed: u32, cycles: Option<u32>) -> bool {
    cycles.is_some_and(|max| completed >= max)
}

pub async fn run_watch(
    config: &DashboardConfig,
    color: bool,
    table: bool,
    interval_secs: Option<u64>,
    cycles: Option<u32>,
) -> anyhow::Result<()> {
    let period = watch_period(config, interval_secs)?;
    let ctl = controller(config)?;
    info!("Watching {} every {:?}", config.api_base, period);

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut completed = 0u32;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted after {} cycles", completed);
                break;
            }
            _ = ticker.tick() => {}
        }

        if ctl.run_cycle().await == CycleOutcome::Skipped {
            warn!("Previous cycle still running; tick skipped");
            continue;
        }
        completed += 1;

        let output = ctl
            .state()
            .read(|s| render::render_dashboard(s, config, RenderOptions { color, table }));
        println!("{}\n", output);

        if limit_reached(completed, cycles) {
            info!("Stopping after {} cycles", completed);
            break;
        }
    }
    Ok(())
}
