use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::error::TrackerError;
use crate::valuation::{gains_losses, Engine};
use crate::view;

const MENU: &str = "\n1) Add stock\n2) Remove stock\n3) View portfolio\n4) View portfolio value\n5) View gains/losses\n6) View portfolio chart\n7) Set price alert\n8) Exit";

/// The interactive menu loop. Input comes through a `BufRead` so tests can
/// drive the shell with a scripted reader.
pub struct Shell<R> {
    input: R,
}

impl<R: BufRead> Shell<R> {
    pub fn new(input: R) -> Shell<R> {
        Shell { input }
    }

    pub async fn run(&mut self, engine: &Engine, currency: &str) -> eyre::Result<()> {
        loop {
            println!("{MENU}");
            let Some(choice) = self.prompt("Enter choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.cmd_add(engine).await?,
                "2" => self.cmd_remove(engine).await?,
                // 4 is a historical alias of 3: both render the live view
                "3" | "4" => self.cmd_view(engine, currency).await?,
                "5" => self.cmd_gains(engine, currency).await?,
                "6" => self.cmd_chart(engine).await?,
                "7" => self.cmd_set_alert(engine).await?,
                "8" => {
                    println!("Exiting. Thank you for using stockfolio!");
                    break;
                }
                _ => println!("{}", "Invalid choice. Please enter 1-8.".red()),
            }
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        print!("{message}");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF behaves like exit
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn cmd_add(&mut self, engine: &Engine) -> eyre::Result<()> {
        let Some(raw) = self.prompt("Enter stock symbol: ")? else {
            return Ok(());
        };
        let symbol = normalize_symbol(&raw);

        let Some(raw) = self.prompt(&format!("Enter number of shares for {symbol}: "))? else {
            return Ok(());
        };
        let shares = match parse_shares(&raw) {
            Ok(shares) => shares,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        let Some(raw) = self.prompt(&format!("Enter purchase price per share for {symbol}: "))?
        else {
            return Ok(());
        };
        let price = match parse_price(&raw) {
            Ok(price) => price,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        match engine.store().add(&symbol, shares, price) {
            Ok(_) => println!(
                "{}",
                format!("Added {shares} shares of {symbol} at ${price:.2} per share.").green()
            ),
            Err(e) => report(&e),
        }
        Ok(())
    }

    async fn cmd_remove(&mut self, engine: &Engine) -> eyre::Result<()> {
        let Some(raw) = self.prompt("Enter stock symbol to remove: ")? else {
            return Ok(());
        };
        let symbol = normalize_symbol(&raw);

        let Some(raw) = self.prompt(&format!("Enter number of shares to remove for {symbol}: "))?
        else {
            return Ok(());
        };
        let shares = match parse_shares(&raw) {
            Ok(shares) => shares,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        use crate::portfolio::RemoveOutcome;
        match engine.store().remove(&symbol, shares) {
            Ok(RemoveOutcome::Reduced { remaining }) => println!(
                "{}",
                format!("Removed {shares} shares of {symbol} ({remaining} remaining).").green()
            ),
            Ok(RemoveOutcome::Closed) => println!(
                "{}",
                format!("Removed all shares of {symbol} from portfolio.").green()
            ),
            Err(e) => report(&e),
        }
        Ok(())
    }

    async fn cmd_view(&mut self, engine: &Engine, currency: &str) -> eyre::Result<()> {
        let empty = engine.store().is_empty();
        if empty {
            report(&TrackerError::EmptyPortfolio);
            return Ok(());
        }

        let rows = engine.snapshot_prices().await;
        view::print_portfolio(&rows, currency);
        Ok(())
    }

    async fn cmd_gains(&mut self, engine: &Engine, currency: &str) -> eyre::Result<()> {
        let empty = engine.store().is_empty();
        if empty {
            report(&TrackerError::EmptyPortfolio);
            return Ok(());
        }

        let rows = engine.snapshot_prices().await;
        let (records, total_delta) = gains_losses(&rows);
        view::print_gains(&records, total_delta, currency);
        Ok(())
    }

    async fn cmd_chart(&mut self, engine: &Engine) -> eyre::Result<()> {
        let empty = engine.store().is_empty();
        if empty {
            report(&TrackerError::EmptyPortfolio);
            return Ok(());
        }

        let rows = engine.snapshot_prices().await;
        view::draw_pie_chart(&rows);
        Ok(())
    }

    async fn cmd_set_alert(&mut self, engine: &Engine) -> eyre::Result<()> {
        let Some(raw) = self.prompt("Enter stock symbol to set alert: ")? else {
            return Ok(());
        };
        let symbol = normalize_symbol(&raw);

        let Some(raw) = self.prompt(&format!("Set HIGH alert price for {symbol}: "))? else {
            return Ok(());
        };
        let high = match parse_decimal(&raw) {
            Ok(high) => high,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        let Some(raw) = self.prompt(&format!("Set LOW alert price for {symbol}: "))? else {
            return Ok(());
        };
        let low = match parse_decimal(&raw) {
            Ok(low) => low,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        // high/low ordering is intentionally not validated
        engine.alerts().set(&symbol, high, low);
        println!(
            "{}",
            format!("Alert set for {symbol}: above ${high:.2} or below ${low:.2}.").green()
        );
        Ok(())
    }
}

fn report(err: &TrackerError) {
    println!("{}", err.to_string().yellow());
}

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn parse_shares(raw: &str) -> Result<u64, TrackerError> {
    raw.trim()
        .parse()
        .map_err(|_| TrackerError::InvalidInput(format!("'{}' is not a whole number", raw.trim())))
}

pub fn parse_decimal(raw: &str) -> Result<f64, TrackerError> {
    raw.trim()
        .parse()
        .map_err(|_| TrackerError::InvalidInput(format!("'{}' is not a number", raw.trim())))
}

pub fn parse_price(raw: &str) -> Result<f64, TrackerError> {
    let price = parse_decimal(raw)?;
    if price < 0.0 {
        return Err(TrackerError::InvalidInput(format!(
            "price cannot be negative, got {price}"
        )));
    }
    Ok(price)
}
