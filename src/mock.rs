use std::collections::HashMap;
use std::sync::Mutex;

use api::{Quote, QuoteParser, QuoteSource, Selectors};
use chrono::Utc;
use futures::future::BoxFuture;

use crate::holding::Position;

/// Serves canned quote pages through the real page parser
pub struct MockQuotes {
    pages: HashMap<String, String>,
    parser: QuoteParser,
    requests: Mutex<Vec<String>>,
}

impl MockQuotes {
    pub fn new() -> MockQuotes {
        MockQuotes {
            pages: HashMap::new(),
            parser: Selectors::default().compile().unwrap(),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn with_page(self, symbol: &str, price: &str, previous_close: &str, change: &str) -> Self {
        let html = quote_page(price, previous_close, change);
        self.with_html(symbol, &html)
    }

    pub fn with_html(mut self, symbol: &str, html: &str) -> Self {
        self.pages.insert(symbol.to_string(), html.to_string());
        self
    }

    /// Symbols requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl QuoteSource for MockQuotes {
    fn get_quote<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, api::Result<Quote>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(symbol.to_string());

            // Unknown symbols land on a search page without a quote header
            let html = self
                .pages
                .get(symbol)
                .map(String::as_str)
                .unwrap_or("<html><body><p>No results</p></body></html>");

            self.parser.parse(symbol, html)
        })
    }
}

pub fn quote_page(price: &str, previous_close: &str, change: &str) -> String {
    format!(
        r#"<html><body>
        <div class="My(6px) Pos(r) smartphone_Mt(6px)">
          <span class="Trsdu(0.3s) Fw(b) Fz(36px)">{}</span>
          <span class="Trsdu(0.3s) Fw(500) Pstart(10px) Fz(24px)">{}</span>
        </div>
        <table><tbody>
          <tr class="Bxz(bb) Bdbw(1px) Bdbs(s) Bdc($seperatorColor) H(36px)">
            <td><span>Previous Close</span></td>
            <td><span>{}</span></td>
          </tr>
        </tbody></table>
        </body></html>"#,
        price, change, previous_close
    )
}

pub fn position(symbol: &str, shares: f64, average_cost: f64, category: &str) -> Position {
    Position {
        index: symbol.to_string(),
        symbol: symbol.to_string(),
        shares,
        average_cost,
        category: category.to_string(),
    }
}

pub fn quote(
    symbol: &str,
    current_price: f64,
    previous_close: f64,
    change: f64,
    percent_change: f64,
) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        current_price,
        previous_close,
        change,
        percent_change,
        fetched_at: Utc::now(),
    }
}
