use crate::error::TrackerError;
use serde::{Deserialize, Serialize};

/// A single portfolio entry: how many shares of a symbol are held and the
/// per-share price recorded at the last purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: u64,
    pub cost_basis: f64,
}

/// What `add` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Merged { total_shares: u64 },
}

/// What `remove` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Reduced { remaining: u64 },
    Closed,
}

/// In-memory holdings, kept in insertion order so views are deterministic.
///
/// A symbol with zero shares is never present: removing the last share
/// deletes the entry.
#[derive(Debug, Default)]
pub struct PortfolioStore {
    holdings: Vec<Holding>,
}

impl PortfolioStore {
    pub fn new() -> PortfolioStore {
        PortfolioStore {
            holdings: Vec::new(),
        }
    }

    /// Record a purchase. Repeated adds for the same symbol accumulate
    /// shares but overwrite the cost basis with the latest price — the
    /// basis is not averaged.
    pub fn add(&mut self, symbol: &str, shares: u64, price: f64) -> Result<AddOutcome, TrackerError> {
        if shares == 0 {
            return Err(TrackerError::InvalidInput(
                "share count must be greater than zero".to_string(),
            ));
        }

        if let Some(holding) = self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            holding.shares += shares;
            holding.cost_basis = price;
            return Ok(AddOutcome::Merged {
                total_shares: holding.shares,
            });
        }

        self.holdings.push(Holding {
            symbol: symbol.to_string(),
            shares,
            cost_basis: price,
        });
        Ok(AddOutcome::Created)
    }

    /// Record a sale. Selling exactly the held amount deletes the entry;
    /// selling more than held fails without touching the holding.
    pub fn remove(&mut self, symbol: &str, shares: u64) -> Result<RemoveOutcome, TrackerError> {
        if shares == 0 {
            return Err(TrackerError::InvalidInput(
                "share count must be greater than zero".to_string(),
            ));
        }

        let index = self
            .holdings
            .iter()
            .position(|h| h.symbol == symbol)
            .ok_or_else(|| TrackerError::NotFound(symbol.to_string()))?;

        let held = self.holdings[index].shares;
        if held < shares {
            return Err(TrackerError::InsufficientShares {
                symbol: symbol.to_string(),
                held,
                requested: shares,
            });
        }

        if held == shares {
            self.holdings.remove(index);
            return Ok(RemoveOutcome::Closed);
        }

        self.holdings[index].shares = held - shares;
        Ok(RemoveOutcome::Reduced {
            remaining: held - shares,
        })
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Clone of the current holdings, taken so callers can iterate (and
    /// fetch quotes) without keeping the store locked.
    pub fn snapshot(&self) -> Vec<Holding> {
        self.holdings.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }
}
