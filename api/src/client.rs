use futures::future::BoxFuture;
use http::{header, Request, Uri};
use isahc::{AsyncReadResponseExt, HttpClient};
use log::debug;

use crate::error::{Error, Result};
use crate::model::{Quote, QuoteParser, Selectors};
use crate::QuoteSource;

pub const DEFAULT_BASE: &str = "https://finance.yahoo.com";

/// Scrapes quote pages at `<base>/quote/<SYMBOL>`
#[derive(Debug)]
pub struct Client {
    client: HttpClient,
    base: String,
    parser: QuoteParser,
    user_agent: Option<String>,
}

impl Client {
    pub fn new() -> Result<Self> {
        Client::with_options(DEFAULT_BASE, &Selectors::default(), None)
    }

    pub fn with_options(
        base: &str,
        selectors: &Selectors,
        user_agent: Option<String>,
    ) -> Result<Self> {
        let client = HttpClient::new().map_err(Error::Client)?;

        Ok(Client {
            client,
            base: base.trim_end_matches('/').to_string(),
            parser: selectors.compile()?,
            user_agent,
        })
    }

    fn get_url(&self, symbol: &str) -> Result<Uri> {
        let uri = format!("{}/quote/{}", self.base, symbol);

        uri.parse::<Uri>()
            .map_err(|source| Error::InvalidUrl { url: uri, source })
    }

    async fn get_page(&self, symbol: &str) -> Result<String> {
        let url = self.get_url(symbol)?;

        debug!("GET {}", url);

        let mut req = Request::builder().method(http::Method::GET).uri(url);

        if let Some(user_agent) = self.user_agent.as_deref() {
            req = req.header(header::USER_AGENT, user_agent);
        }

        let req = req.body(()).map_err(|source| Error::Http {
            symbol: symbol.to_string(),
            source,
        })?;

        let mut res = self
            .client
            .send_async(req)
            .await
            .map_err(|source| Error::Transport {
                symbol: symbol.to_string(),
                source,
            })?;

        if !res.status().is_success() {
            return Err(Error::Status {
                symbol: symbol.to_string(),
                status: res.status(),
            });
        }

        res.text().await.map_err(|source| Error::Body {
            symbol: symbol.to_string(),
            source,
        })
    }

    pub async fn get_quote_data(&self, symbol: &str) -> Result<Quote> {
        let page = self.get_page(symbol).await?;

        self.parser.parse(symbol, &page)
    }
}

impl QuoteSource for Client {
    fn get_quote<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Quote>> {
        Box::pin(self.get_quote_data(symbol))
    }
}
