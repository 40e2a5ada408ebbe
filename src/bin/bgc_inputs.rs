//! Generate biogeochemistry initial conditions and sediment forcing.
//!
//! ```text
//! bgc-inputs --config run.toml [--output ic.nc]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::error::Error;
use std::path::PathBuf;

use bgc_inputs::{load_config, run};
use clap::Parser;
use log::{info, warn};

#[derive(Parser)]
#[command(version, about = "Regrid and fill BGC initial conditions onto an ocean grid")]
struct Cli {
    /// Run configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Output file, overriding the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;

    let summary = run(&config, cli.output.as_deref())?;

    for report in summary.incomplete() {
        warn!("{}: {} ocean cells left missing", report.field, report.residual);
    }
    if let Some(n) = summary.land_adjacent_cells {
        info!("{n} land-adjacent cells received the sediment floor check");
    }
    info!("done: {}", summary.output.display());

    Ok(())
}
