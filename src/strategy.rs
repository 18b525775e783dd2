//! The "simple strategy": click as fast as possible and, once per interval,
//! buy the most expensive upgrade that is affordable right now.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::report::Report;
use crate::session::{GameMirror, GameSession, UpgradeEntry};
use crate::surface::GameSurface;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(4);

/// Pick the upgrade to buy from a freshly refreshed mirror.
///
/// Walks the store top to bottom and keeps the last entry that fits in
/// `money`, stopping at the first one that does not. The store is assumed to
/// be listed cheapest first; nothing checks that.
pub fn select_upgrade(mirror: &GameMirror) -> Option<&UpgradeEntry> {
    let mut choice = None;
    for entry in &mirror.upgrades {
        if entry.price <= mirror.money {
            choice = Some(entry);
        } else {
            break;
        }
    }
    choice
}

#[derive(Debug, Clone)]
pub struct StrategyLoop {
    interval: Duration,
}

impl Default for StrategyLoop {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl StrategyLoop {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Play until the session's produced total reaches its target, then
    /// write the final report.
    ///
    /// The first iteration is a decision point; after that one comes every
    /// `interval`. Each decision point refreshes, prints the stats screen, then
    /// buys. The screen therefore always shows the state from before that purchase.
    #[instrument(skip_all, fields(target = session.target(), interval = ?self.interval))]
    pub async fn run<S: GameSurface>(&self, session: &mut GameSession<S>) -> Result<Report> {
        let mut last_decision: Option<Duration> = None;
        let mut decisions: u64 = 0;

        while !session.target_reached() {
            session.click_primary().await?;

            let elapsed = session.elapsed();
            let due = last_decision.is_none_or(|last| elapsed > last + self.interval);
            if due {
                session.refresh().await?;
                session.print_stats();

                let choice = select_upgrade(session.mirror()).map(|entry| entry.name.clone());
                match choice {
                    Some(name) => session.purchase(&name).await?,
                    None => debug!(money = session.mirror().money, "nothing affordable"),
                }

                decisions += 1;
                last_decision = Some(elapsed);
            }
        }

        info!(
            decisions,
            produced = session.stats().produced,
            clicks = session.stats().clicks,
            "target reached"
        );
        session.final_report().await
    }
}
