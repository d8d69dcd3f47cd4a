use std::io;
use std::sync::{Arc, Mutex};

use clap::{arg, Command};
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::watch;

use crate::alert::AlertRegistry;
use crate::portfolio::PortfolioStore;
use crate::quote::{QuoteSource, YahooQuoteSource};
use crate::shell::Shell;
use crate::valuation::Engine;

mod alert;
mod error;
mod portfolio;
mod quote;
mod refresh;
mod shell;
mod valuation;
mod view;

#[derive(Serialize, Deserialize)]
struct Config {
    currency: String,
    refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            refresh_interval_secs: 60,
        }
    }
}

fn cli() -> Command {
    Command::new("stockfolio")
        .about("An interactive stock portfolio tracker")
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(
            Command::new("track")
                .about("Start the interactive tracker (the default when no subcommand is given)")
                .arg(
                    arg!(--interval <SECS> "Refresh interval in seconds")
                        .required(false)
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

async fn run_tracker(currency: String, interval_secs: u64) -> eyre::Result<()> {
    let store = Arc::new(Mutex::new(PortfolioStore::new()));
    let alerts = Arc::new(Mutex::new(AlertRegistry::new()));
    let quotes: Arc<dyn QuoteSource> = Arc::new(YahooQuoteSource::new());
    let engine = Engine::new(store, alerts, quotes);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh = refresh::spawn(engine.clone(), interval_secs, shutdown_rx, currency.clone());

    let mut shell = Shell::new(io::stdin().lock());
    shell.run(&engine, &currency).await?;

    // stop the poller before exiting so the tick never races teardown
    let _ = shutdown_tx.send(true);
    let _ = refresh.await;
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cfg: Config = confy::load("stockfolio", "config")?;

    let matches = cli().get_matches();

    if matches.subcommand_matches("config").is_some() {
        println!(
            "Your config file is located here: \n{}",
            confy::get_configuration_file_path("stockfolio", "config")?.display()
        );
        return Ok(());
    }

    let mut interval_secs = cfg.refresh_interval_secs;
    if let Some(matches) = matches.subcommand_matches("track") {
        if let Some(secs) = matches.get_one::<u64>("interval") {
            interval_secs = *secs;
        }
    }

    run_tracker(cfg.currency, interval_secs).await
}
