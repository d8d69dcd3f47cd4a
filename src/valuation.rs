use std::sync::{Arc, Mutex, MutexGuard};

use colored::Colorize;
use futures::future::join_all;

use crate::alert::{AlertRegistry, AlertSignal};
use crate::portfolio::{Holding, PortfolioStore};
use crate::quote::QuoteSource;

/// A holding paired with the price fetched for it this round, if any.
#[derive(Debug, Clone)]
pub struct PricedHolding {
    pub holding: Holding,
    pub price: Option<f64>,
}

/// Per-symbol profit/loss against the recorded cost basis.
///
/// `percent` is `None` when the invested cost is zero, in which case the
/// percentage change is undefined.
#[derive(Debug, Clone)]
pub struct GainRecord {
    pub symbol: String,
    pub shares: u64,
    pub cost_basis: f64,
    pub price: f64,
    pub delta: f64,
    pub percent: Option<f64>,
}

/// Reads the portfolio and alert registry, fetches quotes, and computes
/// values. Shared between the interactive shell and the refresh task.
#[derive(Clone)]
pub struct Engine {
    store: Arc<Mutex<PortfolioStore>>,
    alerts: Arc<Mutex<AlertRegistry>>,
    quotes: Arc<dyn QuoteSource>,
}

impl Engine {
    pub fn new(
        store: Arc<Mutex<PortfolioStore>>,
        alerts: Arc<Mutex<AlertRegistry>>,
        quotes: Arc<dyn QuoteSource>,
    ) -> Engine {
        Engine {
            store,
            alerts,
            quotes,
        }
    }

    // Lock scopes stay small and are never held across an await.
    pub fn store(&self) -> MutexGuard<'_, PortfolioStore> {
        self.store.lock().unwrap()
    }

    pub fn alerts(&self) -> MutexGuard<'_, AlertRegistry> {
        self.alerts.lock().unwrap()
    }

    /// Fetch the live price for one symbol and run its alert check.
    ///
    /// Fired alerts are printed as notifications; they never change control
    /// flow. A provider failure is reported and the symbol yields `None`,
    /// so callers skip it for this round.
    pub async fn price_with_alerts(&self, symbol: &str) -> Option<f64> {
        let price = match self.quotes.fetch(symbol).await {
            Ok(price) => price,
            Err(e) => {
                eprintln!("{}", e.to_string().yellow());
                return None;
            }
        };

        let signals = self.alerts.lock().unwrap().check(symbol, price);
        for signal in signals {
            let stamp = chrono::Local::now().format("%H:%M:%S");
            match signal {
                AlertSignal::AboveHigh { threshold } => println!(
                    "{}",
                    format!(
                        "[{stamp}] ALERT: {symbol} has risen above ${threshold:.2}! Current: ${price:.2}"
                    )
                    .red()
                    .bold()
                ),
                AlertSignal::BelowLow { threshold } => println!(
                    "{}",
                    format!(
                        "[{stamp}] ALERT: {symbol} has dropped below ${threshold:.2}! Current: ${price:.2}"
                    )
                    .yellow()
                    .bold()
                ),
            }
        }

        Some(price)
    }

    /// One quote round over a snapshot of the current holdings. The store
    /// lock is released before any fetch starts; the lookups themselves
    /// resolve concurrently.
    pub async fn snapshot_prices(&self) -> Vec<PricedHolding> {
        let snapshot = self.store.lock().unwrap().snapshot();

        let lookups: Vec<_> = snapshot
            .iter()
            .map(|holding| self.price_with_alerts(&holding.symbol))
            .collect();
        let prices = join_all(lookups).await;

        snapshot
            .into_iter()
            .zip(prices)
            .map(|(holding, price)| PricedHolding { holding, price })
            .collect()
    }
}

/// Total portfolio value: price × shares summed over the symbols a quote
/// came back for. Symbols without a price contribute nothing.
pub fn total_value(rows: &[PricedHolding]) -> f64 {
    let mut sum = 0.0;
    for row in rows {
        if let Some(price) = row.price {
            sum += price * row.holding.shares as f64;
        }
    }
    sum
}

/// Profit/loss per priced symbol plus the aggregate delta. Symbols without
/// a price this round are left out of both.
pub fn gains_losses(rows: &[PricedHolding]) -> (Vec<GainRecord>, f64) {
    let mut records = Vec::new();
    let mut total_delta = 0.0;

    for row in rows {
        let Some(price) = row.price else { continue };
        let shares = row.holding.shares as f64;

        let cost = shares * row.holding.cost_basis;
        let current = shares * price;
        let delta = current - cost;
        let percent = if cost != 0.0 {
            Some(delta / cost * 100.0)
        } else {
            None
        };

        total_delta += delta;
        records.push(GainRecord {
            symbol: row.holding.symbol.clone(),
            shares: row.holding.shares,
            cost_basis: row.holding.cost_basis,
            price,
            delta,
            percent,
        });
    }

    (records, total_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::testutil::StaticQuotes;

    fn engine_with(prices: &[(&str, f64)]) -> Engine {
        Engine::new(
            Arc::new(Mutex::new(PortfolioStore::new())),
            Arc::new(Mutex::new(AlertRegistry::new())),
            Arc::new(StaticQuotes::new(prices)),
        )
    }

    #[tokio::test]
    async fn test_failed_quote_is_skipped_not_zeroed() {
        let engine = engine_with(&[("AAPL", 160.0)]);
        {
            let mut store = engine.store();
            store.add("AAPL", 10, 150.0).unwrap();
            store.add("NOPE", 5, 10.0).unwrap();
        }

        let rows = engine.snapshot_prices().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, Some(160.0));
        assert_eq!(rows[1].price, None);

        // the unpriced symbol is excluded from the total, not counted as zero
        assert_eq!(total_value(&rows), 1600.0);
        let (records, _) = gains_losses(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_zero_cost_basis_does_not_poison_the_round() {
        let engine = engine_with(&[("FREE", 10.0), ("AAPL", 160.0)]);
        {
            let mut store = engine.store();
            store.add("FREE", 3, 0.0).unwrap();
            store.add("AAPL", 10, 150.0).unwrap();
        }

        let rows = engine.snapshot_prices().await;
        let (records, total_delta) = gains_losses(&rows);

        let free = records.iter().find(|r| r.symbol == "FREE").unwrap();
        assert_eq!(free.percent, None);
        assert_eq!(free.delta, 30.0);

        let aapl = records.iter().find(|r| r.symbol == "AAPL").unwrap();
        assert_eq!(aapl.delta, 100.0);
        assert!(aapl.percent.is_some());

        assert_eq!(total_delta, 130.0);
    }

    #[tokio::test]
    async fn test_price_lookup_runs_alert_checks() {
        let engine = engine_with(&[("AAPL", 160.0)]);
        engine.alerts().set("AAPL", 155.0, 100.0);

        // alert evaluation rides along with the fetch and does not block it
        let price = engine.price_with_alerts("AAPL").await;
        assert_eq!(price, Some(160.0));

        let price = engine.price_with_alerts("MISSING").await;
        assert_eq!(price, None);
    }

    #[tokio::test]
    async fn test_end_to_end_value_and_gain() {
        let engine = engine_with(&[("AAPL", 160.0)]);
        engine.store().add("AAPL", 10, 150.0).unwrap();

        let rows = engine.snapshot_prices().await;
        assert_eq!(total_value(&rows), 1600.0);

        let (records, total_delta) = gains_losses(&rows);
        assert_eq!(records.len(), 1);
        let aapl = &records[0];
        assert_eq!(aapl.delta, 100.0);
        assert_eq!(total_delta, 100.0);
        assert_eq!(format!("{:.2}%", aapl.percent.unwrap()), "6.67%");
    }
}
