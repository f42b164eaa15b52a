use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use anyhow::{format_err, Context, Result};
use async_std::task;
use log::{error, info};

mod column;
mod error;
mod holding;
mod holdings_table;
#[cfg(test)]
mod mock;
mod opts;
mod plot;
mod portfolio;

use crate::plot::PlotOptions;
use crate::portfolio::Portfolio;

fn main() {
    better_panic::install();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let opts = opts::resolve_opts();

    let holdings = opts.holdings.clone().ok_or_else(|| {
        format_err!("No holdings file given, pass one or set `holdings` in config.yml")
    })?;

    let client = api::Client::with_options(
        opts.base_url.as_deref().unwrap_or(api::DEFAULT_BASE),
        &opts.selectors.clone().unwrap_or_default(),
        opts.user_agent.clone(),
    )
    .context("Failed to set up quote client")?;

    info!("Loading holdings from {}", holdings.display());

    let portfolio = task::block_on(Portfolio::load(
        &holdings,
        &client,
        opts.concurrency.unwrap_or(1),
    ))
    .with_context(|| format!("Failed to value portfolio {}", holdings.display()))?;

    if !opts.quiet {
        println!("{}", portfolio);
    }

    if let Some(path) = opts.export.as_ref() {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        portfolio
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Wrote portfolio table to {}", path.display());
    }

    if !opts.no_plot {
        let defaults = PlotOptions::default();
        let options = PlotOptions {
            x: opts.x.unwrap_or(defaults.x),
            y: opts.y.unwrap_or(defaults.y),
            z: opts.z.unwrap_or(defaults.z),
            size_scalar: opts.size_scalar.unwrap_or(defaults.size_scalar),
            title: defaults.title,
        };

        let output = opts
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(opts::DEFAULT_OUTPUT));

        plot::write_html(&output, &portfolio, &options)?;

        info!("Wrote plot to {}", output.display());
    }

    Ok(())
}
