mod client;
mod error;
pub mod model;

use futures::future::BoxFuture;

pub use client::{Client, DEFAULT_BASE};
pub use error::{Error, Result};
pub use model::{Field, Quote, QuoteParser, Selectors};

/// Trait to define a type that can look up the current [`Quote`] for a
/// ticker symbol.
///
/// Every call is expected to hit the underlying source, nothing is cached.
pub trait QuoteSource: Send + Sync {
    fn get_quote<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Quote>>;
}
