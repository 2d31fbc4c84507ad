//! Command implementations for the water quality CLI.
//!
//! Every command builds the same `RefreshController` the browser dashboard
//! uses, backed by an `Rc<RefCell<ViewState>>`, and prints the view models
//! as text.

use clap::Subcommand;
use wqd_core::config::DashboardConfig;

pub mod query;
pub mod render;
pub mod watch;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the latest reading, predict it and print the dashboard
    Latest {
        /// Also fetch and print the history table
        #[arg(long)]
        table: bool,
    },

    /// Print stored readings, each annotated with its prediction
    History {
        /// Number of readings to request (capped at 50)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Predict a manually entered reading
    Predict {
        /// Water temperature in °C
        #[arg(long)]
        temp: f64,

        /// Dissolved oxygen in mg/L
        #[arg(long = "do")]
        do_mgl: f64,

        #[arg(long)]
        ph: f64,

        /// Conductivity in µS/cm
        #[arg(long)]
        conductivity: f64,

        /// Measured total coliform, in the configured unit
        #[arg(long)]
        coliform: Option<f64>,
    },

    /// Delete every stored reading on the server
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Refresh on a fixed interval until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured refresh interval)
        #[arg(short = 'i', long)]
        interval: Option<u64>,

        /// Stop after this many cycles
        #[arg(short = 'c', long)]
        cycles: Option<u32>,

        /// Also print the history table on every cycle
        #[arg(long)]
        table: bool,
    },

    /// Check that the prediction service is up
    Health,
}

pub async fn run(command: Command, config: DashboardConfig, color: bool) -> anyhow::Result<()> {
    match command {
        Command::Latest { table } => query::run_latest(&config, color, table).await,
        Command::History { limit } => query::run_history(&config, color, limit).await,
        Command::Predict {
            temp,
            do_mgl,
            ph,
            conductivity,
            coliform,
        } => {
            let reading = query::manual_reading(&config, temp, do_mgl, ph, conductivity, coliform);
            query::run_predict(&config, color, reading).await
        }
        Command::Clear { yes } => query::run_clear(&config, yes).await,
        Command::Watch {
            interval,
            cycles,
            table,
        } => watch::run_watch(&config, color, table, interval, cycles).await,
        Command::Health => query::run_health(&config).await,
    }
}
