//! Error types for stockfolio
//!
//! This module defines domain-specific error types that provide clear,
//! actionable error messages to users.

use thiserror::Error;

/// Failures the tracker reports to the user.
///
/// None of these are fatal: the shell prints the message and returns to
/// the menu prompt.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stock {0} is not in your portfolio")]
    NotFound(String),

    #[error("You don't own that many shares of {symbol} (held {held}, requested {requested})")]
    InsufficientShares {
        symbol: String,
        held: u64,
        requested: u64,
    },

    #[error("No price available for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    #[error("Your portfolio is empty")]
    EmptyPortfolio,
}
