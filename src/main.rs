mod catalog;
mod cli;
mod color;
mod config;
mod error;
mod fetch;
mod figure;
mod report;
mod spectra;

use std::fs;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use cli::{Cli, Command};
use config::{ResultLayout, SearchConfig};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let layout = ResultLayout::new(&cli.result_dir);

    match cli.command {
        Command::Fetch(args) => run_fetch(&layout, args.search_config()?),
        Command::Report(args) => run_report(&layout, &args.compiler),
    }
}

/// Fetch stage: query the catalog, keep the raw blob, store the
/// normalized records, and persist the run configuration.
fn run_fetch(layout: &ResultLayout, cfg: SearchConfig) -> Result<()> {
    fs::create_dir_all(layout.root())?;

    let raw = fetch::fetch_catalog(&cfg)?;
    fs::write(layout.raw_csv(), &raw)?;

    let records = catalog::parser::parse_catalog(&raw)?;
    let normalized: Vec<_> = records.iter().map(catalog::normalize::normalize).collect();
    catalog::store::write_normalized(&layout.data_csv(), &normalized)?;
    cfg.save(&layout.job_file())?;

    info!("data saved, total: {}", normalized.len());
    Ok(())
}

/// Report stage: read the stored records back and assemble the report.
fn run_report(layout: &ResultLayout, compiler: &str) -> Result<()> {
    let cfg = SearchConfig::load(&layout.job_file())?;
    let records = catalog::store::read_normalized(&layout.data_csv())?;

    report::assemble(layout, &cfg, &records, compiler)?;
    info!("report written to {}", layout.report_pdf().display());
    Ok(())
}
