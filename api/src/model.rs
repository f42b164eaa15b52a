use std::fmt;

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named fields extracted from a quote page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CurrentPrice,
    PreviousClose,
    Change,
    PercentChange,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::CurrentPrice => "current price",
            Field::PreviousClose => "previous close",
            Field::Change => "change",
            Field::PercentChange => "percent change",
        };

        write!(f, "{}", s)
    }
}

/// Quote fields for a single symbol, as seen at `fetched_at`
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Signed percentage, `9.09` for `+9.09%`
    pub percent_change: f64,
    pub fetched_at: DateTime<Utc>,
}

/// CSS selectors locating each field on the quote page. The first element
/// matched by a selector is the one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub current_price: String,
    pub previous_close: String,
    /// Element holding text of the form `+0.50 (+9.09%)`
    pub change: String,
}

impl Default for Selectors {
    fn default() -> Selectors {
        Selectors {
            current_price: r#"div[class="My(6px) Pos(r) smartphone_Mt(6px)"] span:nth-of-type(1)"#
                .to_string(),
            previous_close: r#"tr[class="Bxz(bb) Bdbw(1px) Bdbs(s) Bdc($seperatorColor) H(36px)"] td:nth-of-type(2) span"#
                .to_string(),
            change: r#"div[class="My(6px) Pos(r) smartphone_Mt(6px)"] span:nth-of-type(2)"#
                .to_string(),
        }
    }
}

impl Selectors {
    pub fn compile(&self) -> Result<QuoteParser> {
        Ok(QuoteParser {
            current_price: compile(Field::CurrentPrice, &self.current_price)?,
            previous_close: compile(Field::PreviousClose, &self.previous_close)?,
            change: compile(Field::Change, &self.change)?,
        })
    }
}

fn compile(field: Field, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled [`Selectors`]
#[derive(Debug, Clone)]
pub struct QuoteParser {
    current_price: Selector,
    previous_close: Selector,
    change: Selector,
}

impl QuoteParser {
    pub fn parse(&self, symbol: &str, html: &str) -> Result<Quote> {
        let document = Html::parse_document(html);

        let current_price =
            field_text(&document, &self.current_price, symbol, Field::CurrentPrice)?;
        let previous_close =
            field_text(&document, &self.previous_close, symbol, Field::PreviousClose)?;
        let change = field_text(&document, &self.change, symbol, Field::Change)?;

        let (change, percent_change) = split_change(symbol, &change)?;

        Ok(Quote {
            symbol: symbol.to_string(),
            current_price: parse_number(symbol, Field::CurrentPrice, &current_price)?,
            previous_close: parse_number(symbol, Field::PreviousClose, &previous_close)?,
            change,
            percent_change,
            fetched_at: Utc::now(),
        })
    }
}

fn field_text(document: &Html, selector: &Selector, symbol: &str, field: Field) -> Result<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| Error::FieldNotFound {
            symbol: symbol.to_string(),
            field,
        })
}

/// Splits `+0.50 (+9.09%)` into `(0.5, 9.09)`
pub fn split_change(symbol: &str, text: &str) -> Result<(f64, f64)> {
    let mut parts = text.split(|c: char| c == '(' || c == ')');

    let change = parts.next().unwrap_or_default();
    let percent = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::FieldNotFound {
            symbol: symbol.to_string(),
            field: Field::PercentChange,
        })?;

    let change = parse_number(symbol, Field::Change, change)?;
    let percent_change = parse_number(
        symbol,
        Field::PercentChange,
        percent.strip_suffix('%').unwrap_or(percent),
    )?;

    Ok((change, percent_change))
}

/// Accepts a leading sign and thousands separators, `-1,234.50`
pub fn parse_number(symbol: &str, field: Field, text: &str) -> Result<f64> {
    let cleaned = text.trim().replace(',', "");

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidNumber {
            symbol: symbol.to_string(),
            field,
            text: text.to_string(),
        }),
    }
}
