use std::time::Duration;

use colored::Colorize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::valuation::Engine;
use crate::view;

/// Spawn the background poller: every tick it renders the same live view as
/// the manual command, alert checks included. Ticks are skipped while the
/// portfolio is empty. A slow provider stalls the tick, not the process.
///
/// The task stops when the shutdown flag flips to true, so the process can
/// exit cleanly instead of tearing the loop down mid-fetch.
pub fn spawn(
    engine: Engine,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
    currency: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let empty = engine.store().is_empty();
                    if empty {
                        continue;
                    }

                    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                    println!("\n{}", format!("--- portfolio refresh @ {stamp} ---").cyan());

                    let rows = engine.snapshot_prices().await;
                    view::print_portfolio(&rows, &currency);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
