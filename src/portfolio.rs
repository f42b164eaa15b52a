use std::fmt;
use std::io;
use std::path::Path;

use api::QuoteSource;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::info;
use serde::Serialize;

use crate::error::{PortfolioError, Result};
use crate::holding::{Holding, Position};
use crate::holdings_table;

/// One row of the merged table: input columns, derived columns and diversity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRow {
    #[serde(rename = "Index")]
    pub index: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Shares")]
    pub shares: f64,
    #[serde(rename = "Average Cost")]
    pub average_cost: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Current Price")]
    pub current_price: f64,
    #[serde(rename = "Previous Close")]
    pub previous_close: f64,
    #[serde(rename = "Change")]
    pub change: f64,
    #[serde(rename = "Percent Change")]
    pub percent_change: f64,
    #[serde(rename = "Market Value")]
    pub market_value: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Todays Return")]
    pub todays_return: f64,
    #[serde(rename = "Total Return")]
    pub total_return: f64,
    #[serde(rename = "Portfolio Diversity")]
    pub portfolio_diversity: f64,
}

/// Holdings in table order, each with its share of the total cost. Built once,
/// load a new `Portfolio` to pick up new prices.
#[derive(Debug, Clone)]
pub struct Portfolio {
    holdings: Vec<Holding>,
    diversity: Vec<f64>,
    total_cost: f64,
}

impl Portfolio {
    pub async fn load<S>(path: &Path, source: &S, concurrency: usize) -> Result<Portfolio>
    where
        S: QuoteSource + ?Sized,
    {
        let positions = holdings_table::read_path(path)?;

        Portfolio::from_positions(positions, source, concurrency).await
    }

    /// Fetches a quote per position with at most `concurrency` requests in
    /// flight. Holdings keep position order and the first failure aborts the
    /// whole load.
    pub async fn from_positions<S>(
        positions: Vec<Position>,
        source: &S,
        concurrency: usize,
    ) -> Result<Portfolio>
    where
        S: QuoteSource + ?Sized,
    {
        if positions.is_empty() {
            return Err(PortfolioError::EmptyTable);
        }

        info!(
            "Fetching quotes for {} holdings ({} at a time)",
            positions.len(),
            concurrency.max(1)
        );

        let holdings = stream::iter(positions)
            .map(|position| Holding::fetch(source, position))
            .buffered(concurrency.max(1))
            .try_collect::<Vec<_>>()
            .await?;

        Portfolio::from_holdings(holdings)
    }

    pub fn from_holdings(holdings: Vec<Holding>) -> Result<Portfolio> {
        let (diversity, total_cost) = diversity(holdings.iter().map(|h| h.metrics.cost))?;

        info!(
            "Valued {} holdings, total cost {:.2}",
            holdings.len(),
            total_cost
        );

        Ok(Portfolio {
            holdings,
            diversity,
            total_cost,
        })
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Aligned with [`holdings`](Self::holdings)
    pub fn diversity(&self) -> &[f64] {
        &self.diversity
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn market_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.metrics.market_value).sum()
    }

    pub fn todays_return(&self) -> f64 {
        self.holdings.iter().map(|h| h.metrics.todays_return).sum()
    }

    pub fn total_return(&self) -> f64 {
        self.holdings.iter().map(|h| h.metrics.total_return).sum()
    }

    /// Time of the most recent quote
    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.holdings.iter().map(|h| h.quote.fetched_at).max()
    }

    pub fn rows(&self) -> Vec<PortfolioRow> {
        self.holdings
            .iter()
            .zip(self.diversity.iter())
            .map(|(holding, diversity)| PortfolioRow {
                index: holding.position.index.clone(),
                name: holding.position.symbol.clone(),
                shares: holding.position.shares,
                average_cost: holding.position.average_cost,
                category: holding.position.category.clone(),
                current_price: holding.quote.current_price,
                previous_close: holding.quote.previous_close,
                change: holding.quote.change,
                percent_change: holding.quote.percent_change,
                market_value: holding.metrics.market_value,
                cost: holding.metrics.cost,
                todays_return: holding.metrics.todays_return,
                total_return: holding.metrics.total_return,
                portfolio_diversity: *diversity,
            })
            .collect()
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        for row in self.rows() {
            writer.serialize(row)?;
        }

        writer.flush().map_err(csv::Error::from)?;

        Ok(())
    }
}

/// Splits `costs` into fractions of their sum, returned with the sum
pub fn diversity<I>(costs: I) -> Result<(Vec<f64>, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let costs = costs.into_iter().collect::<Vec<_>>();
    let total_cost: f64 = costs.iter().sum();

    if total_cost == 0.0 || !total_cost.is_finite() {
        return Err(PortfolioError::ZeroTotalCost);
    }

    let diversity = costs.iter().map(|cost| cost / total_cost).collect();

    Ok((diversity, total_cost))
}

pub fn format_pct(pct: f64) -> String {
    format!("{:+.2}%", pct)
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(as_of) = self.as_of() {
            writeln!(
                f,
                "As of {}",
                as_of.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
            )?;
        }

        writeln!(
            f,
            "{:<6} {:<8} {:>10} {:>12} {:<12} {:>10} {:>10} {:>9} {:>9} {:>12} {:>12} {:>10} {:>12} {:>9} {:>9}",
            "Index",
            "Name",
            "Shares",
            "Average Cost",
            "Category",
            "Price",
            "Prev Close",
            "Change",
            "% Change",
            "Mkt Value",
            "Cost",
            "Today",
            "Total Return",
            "Return %",
            "Diversity"
        )?;

        for (row, holding) in self.rows().into_iter().zip(self.holdings()) {
            writeln!(
                f,
                "{:<6} {:<8} {:>10.2} {:>12.2} {:<12} {:>10.2} {:>10.2} {:>+9.2} {:>9} {:>12.2} {:>12.2} {:>+10.2} {:>+12.2} {:>9} {:>9}",
                row.index,
                row.name,
                row.shares,
                row.average_cost,
                row.category,
                row.current_price,
                row.previous_close,
                row.change,
                format_pct(row.percent_change),
                row.market_value,
                row.cost,
                row.todays_return,
                row.total_return,
                format_pct(holding.total_return_pct()),
                format!("{:.2}%", row.portfolio_diversity * 100.0)
            )?;
        }

        write!(
            f,
            "{:<6} {:<8} {:>10} {:>12} {:<12} {:>10} {:>10} {:>9} {:>9} {:>12.2} {:>12.2} {:>+10.2} {:>+12.2} {:>9} {:>9}",
            "Total",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            self.market_value(),
            self.total_cost(),
            self.todays_return(),
            self.total_return(),
            format_pct(self.total_return() / self.total_cost() * 100.0),
            format!("{:.2}%", self.diversity().iter().sum::<f64>() * 100.0)
        )
    }
}
