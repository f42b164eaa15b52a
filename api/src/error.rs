use thiserror::Error;

use crate::model::Field;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid quote url {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    #[error("failed to build http client")]
    Client(#[source] isahc::Error),

    #[error("failed to build request for {symbol}")]
    Http {
        symbol: String,
        #[source]
        source: http::Error,
    },

    #[error("request for {symbol} failed")]
    Transport {
        symbol: String,
        #[source]
        source: isahc::Error,
    },

    #[error("quote page for {symbol} returned {status}")]
    Status {
        symbol: String,
        status: http::StatusCode,
    },

    #[error("failed to read quote page for {symbol}")]
    Body {
        symbol: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {field} selector {selector:?}: {reason}")]
    Selector {
        field: Field,
        selector: String,
        reason: String,
    },

    /// The page layout did not contain the element for `field`.
    #[error("{field} not found in quote page for {symbol}")]
    FieldNotFound { symbol: String, field: Field },

    #[error("{field} for {symbol} is not a number: {text:?}")]
    InvalidNumber {
        symbol: String,
        field: Field,
        text: String,
    },
}
