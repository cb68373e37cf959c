use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::SearchConfig;
use crate::report::DEFAULT_COMPILER;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Pulsar catalog survey reporter.
///
/// `fetch` queries the catalog service for sources around a sky position
/// and stores a unit-normalized copy; `report` renders the sky map, the
/// per-source spectral overlays and the typeset summary table from it.
#[derive(Parser, Debug)]
#[command(name = "pulsar-atlas", version, about)]
pub struct Cli {
    /// Directory holding this run's inputs and artifacts
    #[arg(long = "result-dir", value_name = "DIR", default_value = "result")]
    pub result_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query the catalog service and store the normalized records
    Fetch(FetchArgs),
    /// Assemble the report from previously fetched records
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Search center as right ascension and declination, in degrees
    #[arg(
        short = 'c',
        long = "coor",
        num_args = 2,
        value_names = ["RA", "DEC"],
        required = true
    )]
    pub coor: Vec<f64>,

    /// Search radius in degrees
    #[arg(short = 'r', long = "radius", value_name = "DEG", required = true)]
    pub radius: f64,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Typesetter binary used to compile the report
    #[arg(long = "compiler", value_name = "BIN", default_value = DEFAULT_COMPILER)]
    pub compiler: String,
}

impl FetchArgs {
    /// Validate the coordinate ranges and build the run configuration.
    pub fn search_config(&self) -> Result<SearchConfig> {
        let (ra_deg, dec_deg) = (self.coor[0], self.coor[1]);
        if !(0.0 < ra_deg && ra_deg < 360.0) {
            bail!("<ra> should be within (0, 360) degrees");
        }
        if !(-90.0 < dec_deg && dec_deg < 90.0) {
            bail!("<dec> should be within (-90, 90) degrees");
        }
        Ok(SearchConfig {
            ra_deg,
            dec_deg,
            radius_deg: self.radius,
        })
    }
}
