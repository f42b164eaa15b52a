use api::{Quote, QuoteSource};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, Result};

/// One row of the holdings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub index: String,
    pub symbol: String,
    pub shares: f64,
    pub average_cost: f64,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub market_value: f64,
    pub cost: f64,
    pub todays_return: f64,
    pub total_return: f64,
}

impl Metrics {
    pub fn derive(position: &Position, quote: &Quote) -> Metrics {
        let market_value = position.shares * quote.current_price;
        let cost = position.average_cost * position.shares;

        Metrics {
            market_value,
            cost,
            todays_return: position.shares * quote.change,
            total_return: market_value - cost,
        }
    }
}

/// A position valued at the quote it was constructed with. Prices are never
/// refreshed, build a new `Holding` instead.
#[derive(Debug, Clone)]
pub struct Holding {
    pub position: Position,
    pub quote: Quote,
    pub metrics: Metrics,
}

impl Holding {
    pub fn new(position: Position, quote: Quote) -> Holding {
        let metrics = Metrics::derive(&position, &quote);

        Holding {
            position,
            quote,
            metrics,
        }
    }

    pub async fn fetch<S>(source: &S, position: Position) -> Result<Holding>
    where
        S: QuoteSource + ?Sized,
    {
        let quote = source
            .get_quote(&position.symbol)
            .await
            .map_err(|source| PortfolioError::Quote {
                symbol: position.symbol.clone(),
                source,
            })?;

        let holding = Holding::new(position, quote);

        debug!(
            "{}: price {:.2}, market value {:.2}, total return {:.2}",
            holding.position.symbol,
            holding.quote.current_price,
            holding.metrics.market_value,
            holding.metrics.total_return
        );

        Ok(holding)
    }

    /// Return on cost in percent, zero when nothing was paid
    pub fn total_return_pct(&self) -> f64 {
        if self.position.average_cost > 0.0 {
            (self.quote.current_price / self.position.average_cost - 1.0) * 100.0
        } else {
            0.0
        }
    }
}
