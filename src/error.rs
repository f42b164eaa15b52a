use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = PortfolioError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to open holdings table {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed holdings table")]
    Csv(#[from] csv::Error),

    #[error("holdings table is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("holdings table row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("holdings table has no rows")]
    EmptyTable,

    #[error("failed to get quote for {symbol}")]
    Quote {
        symbol: String,
        #[source]
        source: api::Error,
    },

    /// Diversity is undefined when nothing was paid for any holding
    #[error("total cost of the portfolio is zero, diversity is undefined")]
    ZeroTotalCost,
}
