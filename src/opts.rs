use std::fs;
use std::path::PathBuf;

use anyhow::{format_err, Error};
use api::Selectors;
use serde::Deserialize;
use structopt::StructOpt;

use crate::column::Column;

pub const DEFAULT_OUTPUT: &str = "portfolio.html";

pub fn resolve_opts() -> Opts {
    let opts = get_cli_opts();

    match get_config_opts() {
        Ok(config_opts) => opts.merge(config_opts),
        Err(_) => opts,
    }
}

fn get_cli_opts() -> Opts {
    Opts::from_args()
}

fn get_config_opts() -> Result<Opts, Error> {
    let config_dir = dirs_next::config_dir()
        .ok_or_else(|| format_err!("Could not get config directory"))?
        .join("holdrs");

    let config_path = config_dir.join("config.yml");

    let config = fs::read_to_string(&config_path)?;

    let opts = serde_yaml::from_str(&config)?;

    Ok(opts)
}

#[derive(Debug, StructOpt, Clone, Deserialize, Default)]
#[structopt(
    name = "holdrs",
    about = "Value a stock portfolio from live quotes 📈",
    version = env!("CARGO_PKG_VERSION")
)]
#[serde(default)]
pub struct Opts {
    // Options
    //
    #[structopt(parse(from_os_str))]
    /// Holdings csv with Name, Shares, Average Cost and Category columns
    pub holdings: Option<PathBuf>,
    #[structopt(short, long)]
    /// Column for the x axis [default: Category]
    pub x: Option<Column>,
    #[structopt(short, long)]
    /// Column for the y axis [default: Cost]
    pub y: Option<Column>,
    #[structopt(short, long)]
    /// Column for the z axis [default: Total Return]
    pub z: Option<Column>,
    #[structopt(long)]
    /// Largest marker is drawn size-scalar² pixels across [default: 10]
    pub size_scalar: Option<f64>,
    #[structopt(short, long, parse(from_os_str))]
    /// Where to write the plot [default: portfolio.html]
    pub output: Option<PathBuf>,
    #[structopt(short, long, parse(from_os_str))]
    /// Also write the valued portfolio table as csv
    pub export: Option<PathBuf>,
    #[structopt(short = "j", long)]
    /// Number of quotes to request at once [default: 1]
    pub concurrency: Option<usize>,
    #[structopt(long)]
    /// Quote site, pages are fetched from <base-url>/quote/<SYMBOL> [default: https://finance.yahoo.com]
    pub base_url: Option<String>,
    #[structopt(long)]
    /// User-Agent header sent with quote requests
    pub user_agent: Option<String>,
    #[structopt(skip)]
    /// Where each field lives on the quote page, only read from the config file
    pub selectors: Option<Selectors>,

    // Flags
    //
    #[structopt(long)]
    /// Don't write the plot
    pub no_plot: bool,
    #[structopt(short, long)]
    /// Don't print the portfolio table
    pub quiet: bool,
}

impl Opts {
    /// Fills anything unset on the command line from `config`
    pub fn merge(mut self, config: Opts) -> Opts {
        // Options
        self.holdings = self.holdings.or(config.holdings);
        self.x = self.x.or(config.x);
        self.y = self.y.or(config.y);
        self.z = self.z.or(config.z);
        self.size_scalar = self.size_scalar.or(config.size_scalar);
        self.output = self.output.or(config.output);
        self.export = self.export.or(config.export);
        self.concurrency = self.concurrency.or(config.concurrency);
        self.base_url = self.base_url.or(config.base_url);
        self.user_agent = self.user_agent.or(config.user_agent);
        self.selectors = self.selectors.or(config.selectors);

        // Flags
        self.no_plot = self.no_plot || config.no_plot;
        self.quiet = self.quiet || config.quiet;

        self
    }
}
