use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::portfolio::PortfolioRow;

/// Columns of the merged portfolio table that can be put on a plot axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Column {
    Index,
    Name,
    Shares,
    AverageCost,
    Category,
    CurrentPrice,
    PreviousClose,
    Change,
    PercentChange,
    MarketValue,
    Cost,
    TodaysReturn,
    TotalReturn,
    PortfolioDiversity,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Index,
        Column::Name,
        Column::Shares,
        Column::AverageCost,
        Column::Category,
        Column::CurrentPrice,
        Column::PreviousClose,
        Column::Change,
        Column::PercentChange,
        Column::MarketValue,
        Column::Cost,
        Column::TodaysReturn,
        Column::TotalReturn,
        Column::PortfolioDiversity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Index => "Index",
            Column::Name => "Name",
            Column::Shares => "Shares",
            Column::AverageCost => "Average Cost",
            Column::Category => "Category",
            Column::CurrentPrice => "Current Price",
            Column::PreviousClose => "Previous Close",
            Column::Change => "Change",
            Column::PercentChange => "Percent Change",
            Column::MarketValue => "Market Value",
            Column::Cost => "Cost",
            Column::TodaysReturn => "Todays Return",
            Column::TotalReturn => "Total Return",
            Column::PortfolioDiversity => "Portfolio Diversity",
        }
    }

    pub fn cell(self, row: &PortfolioRow) -> Cell {
        match self {
            Column::Index => Cell::Text(row.index.clone()),
            Column::Name => Cell::Text(row.name.clone()),
            Column::Category => Cell::Text(row.category.clone()),
            Column::Shares => Cell::Number(row.shares),
            Column::AverageCost => Cell::Number(row.average_cost),
            Column::CurrentPrice => Cell::Number(row.current_price),
            Column::PreviousClose => Cell::Number(row.previous_close),
            Column::Change => Cell::Number(row.change),
            Column::PercentChange => Cell::Number(row.percent_change),
            Column::MarketValue => Cell::Number(row.market_value),
            Column::Cost => Cell::Number(row.cost),
            Column::TodaysReturn => Cell::Number(row.todays_return),
            Column::TotalReturn => Cell::Number(row.total_return),
            Column::PortfolioDiversity => Cell::Number(row.portfolio_diversity),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Case insensitive, `total_return` and `total-return` match `Total Return`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(|c: char| c == '_' || c == '-', " ");

        Column::ALL
            .iter()
            .copied()
            .find(|column| column.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                format!(
                    "unknown column {:?}, expected one of: {}",
                    s,
                    Column::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl TryFrom<String> for Column {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A single value of the merged table. Text columns plot as categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}
