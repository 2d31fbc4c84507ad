//! WQD CLI - Command line front end for the water quality prediction service.

use clap::Parser;
use log::debug;
use wqd_core::config::{
    ColiformUnit, DashboardConfig, ENV_API_BASE, ENV_COLIFORM_UNIT, ENV_UTC_OFFSET_MINUTES,
};

#[derive(Parser)]
#[command(
    name = "wqd-cli",
    version,
    about = "Water quality dashboard in the terminal"
)]
struct Cli {
    /// Base URL of the prediction / IoT service
    #[arg(long, global = true, env = ENV_API_BASE)]
    api_base: Option<String>,

    /// Coliform unit sent to /predict and shown in tables (mv or mpn)
    #[arg(long, global = true, env = ENV_COLIFORM_UNIT)]
    coliform_unit: Option<ColiformUnit>,

    /// Display offset for timestamps, in minutes east of UTC
    #[arg(long, global = true, allow_negative_numbers = true, env = ENV_UTC_OFFSET_MINUTES)]
    utc_offset: Option<i32>,

    /// Never send the measured coliform value with predictions
    #[arg(long, global = true)]
    no_coliform: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: wqd_cmd::Command,
}

impl Cli {
    /// Environment first, then explicit flags on top.
    fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::from_env();
        if let Some(base) = &self.api_base {
            config = config.with_api_base(base.as_str());
        }
        if let Some(unit) = self.coliform_unit {
            config.coliform_unit = unit;
        }
        if let Some(minutes) = self.utc_offset {
            config.utc_offset_minutes = minutes;
        }
        if self.no_coliform {
            config.send_measured_coliform = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config();
    debug!("Using {:?}", config);
    wqd_cmd::run(cli.command, config, !cli.no_color).await
}
