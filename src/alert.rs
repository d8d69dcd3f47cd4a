use std::collections::HashMap;

/// High/low price boundaries registered for a symbol.
///
/// The ordering of `high` vs `low` is not validated: a caller may register
/// an inverted pair, in which case a single price can trip both boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThreshold {
    pub high: f64,
    pub low: f64,
}

/// A threshold crossing observed for one fetched price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertSignal {
    AboveHigh { threshold: f64 },
    BelowLow { threshold: f64 },
}

/// Per-symbol alert thresholds, independent of what is actually held.
#[derive(Debug, Default)]
pub struct AlertRegistry {
    thresholds: HashMap<String, AlertThreshold>,
}

impl AlertRegistry {
    pub fn new() -> AlertRegistry {
        AlertRegistry {
            thresholds: HashMap::new(),
        }
    }

    /// Register thresholds for a symbol, replacing any existing pair.
    pub fn set(&mut self, symbol: &str, high: f64, low: f64) {
        self.thresholds
            .insert(symbol.to_string(), AlertThreshold { high, low });
    }

    pub fn get(&self, symbol: &str) -> Option<&AlertThreshold> {
        self.thresholds.get(symbol)
    }

    /// Compare a fetched price against the symbol's thresholds. Signals
    /// re-fire on every check while the price stays past a boundary; there
    /// is no suppression between rounds.
    pub fn check(&self, symbol: &str, price: f64) -> Vec<AlertSignal> {
        let mut signals = Vec::new();

        if let Some(threshold) = self.thresholds.get(symbol) {
            if price >= threshold.high {
                signals.push(AlertSignal::AboveHigh {
                    threshold: threshold.high,
                });
            }
            if price <= threshold.low {
                signals.push(AlertSignal::BelowLow {
                    threshold: threshold.low,
                });
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_thresholds_no_signals() {
        let registry = AlertRegistry::new();
        assert!(registry.check("AAPL", 100.0).is_empty());
    }

    #[test]
    fn test_above_high_fires_at_and_past_the_boundary() {
        let mut registry = AlertRegistry::new();
        registry.set("AAPL", 150.0, 100.0);

        assert_eq!(
            registry.check("AAPL", 150.0),
            vec![AlertSignal::AboveHigh { threshold: 150.0 }]
        );
        assert_eq!(
            registry.check("AAPL", 175.5),
            vec![AlertSignal::AboveHigh { threshold: 150.0 }]
        );
        assert!(registry.check("AAPL", 149.99).is_empty());
    }

    #[test]
    fn test_below_low_fires_at_and_past_the_boundary() {
        let mut registry = AlertRegistry::new();
        registry.set("AAPL", 150.0, 100.0);

        assert_eq!(
            registry.check("AAPL", 100.0),
            vec![AlertSignal::BelowLow { threshold: 100.0 }]
        );
        assert_eq!(
            registry.check("AAPL", 80.0),
            vec![AlertSignal::BelowLow { threshold: 100.0 }]
        );
    }

    #[test]
    fn test_inverted_thresholds_can_fire_both_signals() {
        let mut registry = AlertRegistry::new();
        // low above high is accepted as-is
        registry.set("AAPL", 100.0, 150.0);

        let signals = registry.check("AAPL", 120.0);
        assert_eq!(
            signals,
            vec![
                AlertSignal::AboveHigh { threshold: 100.0 },
                AlertSignal::BelowLow { threshold: 150.0 },
            ]
        );
    }

    #[test]
    fn test_set_overwrites_previous_thresholds() {
        let mut registry = AlertRegistry::new();
        registry.set("AAPL", 150.0, 100.0);
        registry.set("AAPL", 200.0, 50.0);

        assert_eq!(
            registry.get("AAPL"),
            Some(&AlertThreshold {
                high: 200.0,
                low: 50.0
            })
        );
        assert!(registry.check("AAPL", 160.0).is_empty());
    }
}
