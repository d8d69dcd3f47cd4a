use crate::error::TrackerError;
use futures::future::BoxFuture;
use yahoo_finance_api as yahoo;

/// Where live prices come from.
///
/// A failed fetch means "no data for this symbol this round": callers skip
/// the symbol and try again on the next fetch. Nothing is cached.
pub trait QuoteSource: Send + Sync {
    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<f64, TrackerError>>;
}

/// Live quotes from Yahoo Finance. The price of a symbol is the close of
/// its latest 1d quote.
#[derive(Debug, Default)]
pub struct YahooQuoteSource;

impl YahooQuoteSource {
    pub fn new() -> YahooQuoteSource {
        YahooQuoteSource
    }
}

impl QuoteSource for YahooQuoteSource {
    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<f64, TrackerError>> {
        Box::pin(async move {
            let response = yahoo::YahooConnector::new()
                .map_err(|e| TrackerError::QuoteUnavailable {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })?
                .get_latest_quotes(symbol, "1d")
                .await
                .map_err(|e| TrackerError::QuoteUnavailable {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })?;

            let quote = response
                .last_quote()
                .map_err(|e| TrackerError::QuoteUnavailable {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })?;

            Ok(quote.close)
        })
    }
}

#[cfg(test)]
pub mod testutil {
    use super::*;
    use std::collections::HashMap;

    /// Fixed price table for tests; symbols absent from the table fail the
    /// way an unavailable provider does.
    pub struct StaticQuotes {
        prices: HashMap<String, f64>,
    }

    impl StaticQuotes {
        pub fn new(prices: &[(&str, f64)]) -> StaticQuotes {
            StaticQuotes {
                prices: prices
                    .iter()
                    .map(|(symbol, price)| (symbol.to_string(), *price))
                    .collect(),
            }
        }
    }

    impl QuoteSource for StaticQuotes {
        fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<f64, TrackerError>> {
            Box::pin(async move {
                self.prices
                    .get(symbol)
                    .copied()
                    .ok_or_else(|| TrackerError::QuoteUnavailable {
                        symbol: symbol.to_string(),
                        reason: "no quote data".to_string(),
                    })
            })
        }
    }
}
