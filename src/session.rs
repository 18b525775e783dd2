//! A running game: the surface connection, the local mirror of what the page
//! shows, and the statistics gathered while playing.
//!
//! The session is the only thing that talks to the surface. The mirror changes
//! only in [`GameSession::refresh`] and is stale in between; the stats change
//! only through the primitive actions.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, trace};

use crate::config::{Config, Selectors};
use crate::display::{self, Screen};
use crate::error::{GameError, Result};
use crate::report::Report;
use crate::scrape::{parse_count, parse_rate, parse_store_label};
use crate::surface::GameSurface;

/// One purchasable entry in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeEntry {
    pub name: String,
    /// 1-based position in the store, top to bottom
    pub rank: u32,
    pub price: u64,
}

/// Last observed state of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMirror {
    pub money: u64,
    pub rate: f64,
    /// Store entries in display order; names are unique
    pub upgrades: Vec<UpgradeEntry>,
}

impl GameMirror {
    pub fn get(&self, name: &str) -> Option<&UpgradeEntry> {
        self.upgrades.iter().find(|u| u.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.upgrades.iter().map(|u| u.name.as_str())
    }
}

/// Running totals for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub start: Instant,
    pub clicks: u64,
    pub purchases: u64,
    pub spent: u64,
    /// Sum of the money reading taken at every refresh
    pub produced: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            clicks: 0,
            purchases: 0,
            spent: 0,
            produced: 0,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction-time settings for a [`GameSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub name: String,
    pub target: u64,
    pub show_numbers: bool,
    pub output_dir: PathBuf,
    pub selectors: Selectors,
}

impl SessionOptions {
    pub fn new(name: impl Into<String>, target: u64) -> Self {
        let defaults = Config::default();
        Self {
            name: name.into(),
            target,
            show_numbers: defaults.session.show_numbers,
            output_dir: defaults.session.output_dir,
            selectors: defaults.selectors,
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_stats.txt", self.name))
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            name: config.session.name.clone(),
            target: config.session.target,
            show_numbers: config.session.show_numbers,
            output_dir: config.session.output_dir.clone(),
            selectors: config.selectors.clone(),
        }
    }
}

pub struct GameSession<S> {
    surface: S,
    options: SessionOptions,
    mirror: GameMirror,
    stats: RunStats,
    screen: Screen,
}

impl<S: GameSurface> GameSession<S> {
    /// Take ownership of a connected surface and read the store once.
    ///
    /// Missing elements at this point mean the page is not the game (or never
    /// loaded), so they are reported as [`GameError::Connection`].
    #[instrument(skip(surface, options), fields(name = %options.name, target = options.target))]
    pub async fn initialize(mut surface: S, options: SessionOptions) -> Result<Self> {
        if !options.show_numbers {
            surface
                .click(&options.selectors.toggle_numbers)
                .await
                .map_err(into_connection)?;
            debug!("numbers display toggled off");
        }

        let upgrades = scrape_catalog(&mut surface, &options.selectors)
            .await
            .map_err(into_connection)?;
        if upgrades.is_empty() {
            return Err(GameError::Connection(format!(
                "store {:?} has no entries",
                options.selectors.store_items
            )));
        }
        info!(upgrades = upgrades.len(), "session initialized");

        Ok(Self {
            surface,
            options,
            mirror: GameMirror {
                upgrades,
                ..GameMirror::default()
            },
            stats: RunStats::new(),
            screen: Screen::stdout(),
        })
    }

    /// Send the stats screen and the final report somewhere other than stdout.
    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    pub fn mirror(&self) -> &GameMirror {
        &self.mirror
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn target(&self) -> u64 {
        self.options.target
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn target_reached(&self) -> bool {
        self.stats.produced >= self.options.target
    }

    /// Click the big cookie once. The click is counted whether or not the page registered it.
    pub async fn click_primary(&mut self) -> Result<()> {
        self.surface.click(&self.options.selectors.cookie).await?;
        self.stats.clicks += 1;
        trace!(clicks = self.stats.clicks, "click");
        Ok(())
    }

    /// Re-read money, rate and the store, replacing the mirror.
    ///
    /// Every refresh adds the money *reading* to `produced`, so money that is
    /// not spent between two refreshes is counted twice.
    pub async fn refresh(&mut self) -> Result<()> {
        let upgrades = scrape_catalog(&mut self.surface, &self.options.selectors).await?;
        if upgrades.len() < self.mirror.upgrades.len() {
            return Err(GameError::ElementNotFound(format!(
                "store shrank from {} to {} entries",
                self.mirror.upgrades.len(),
                upgrades.len()
            )));
        }

        let money_text = self.surface.read_text(&self.options.selectors.money).await?;
        let money = parse_count(&money_text).map_err(|_| GameError::parse("money", money_text))?;
        let rate_text = self.surface.read_text(&self.options.selectors.rate).await?;
        let rate = parse_rate(&rate_text)?;

        self.mirror = GameMirror {
            money,
            rate,
            upgrades,
        };
        self.stats.produced = self.stats.produced.saturating_add(money);
        debug!(money, rate, produced = self.stats.produced, "refreshed");
        Ok(())
    }

    /// Buy one of `upgrade` at its mirrored price.
    ///
    /// The page is not re-read afterwards; refresh before trusting prices again.
    pub async fn purchase(&mut self, upgrade: &str) -> Result<()> {
        let price = self
            .mirror
            .get(upgrade)
            .map(|entry| entry.price)
            .ok_or_else(|| GameError::KeyNotFound(upgrade.to_string()))?;

        let selector = self.options.selectors.buy(upgrade);
        self.surface.click(&selector).await?;
        self.stats.purchases += 1;
        self.stats.spent = self.stats.spent.saturating_add(price);
        info!(upgrade, price, purchases = self.stats.purchases, "bought upgrade");
        Ok(())
    }

    pub fn elapsed(&self) -> Duration {
        self.stats.start.elapsed()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    pub fn digital_elapsed_time(&self) -> String {
        display::digital_elapsed_time(self.elapsed())
    }

    pub fn print_stats(&mut self) {
        let text = display::render_stats(&self.stats, &self.mirror, self.options.target, self.elapsed());
        self.screen.show(&text);
    }

    /// Read the owned-count breakdown, write `{name}_stats.txt` and echo it.
    #[instrument(skip(self), fields(name = %self.options.name))]
    pub async fn final_report(&mut self) -> Result<Report> {
        let breakdown = self.scrape_breakdown().await?;
        let report = Report {
            name: self.options.name.clone(),
            stats: self.stats,
            elapsed: self.elapsed(),
            final_rate: self.mirror.rate,
            breakdown,
        };

        let path = self.options.report_path();
        let contents = report.persist(&path)?;
        info!(path = %path.display(), "stats written");
        self.screen.show(&format!("\n{}\n", contents));
        Ok(report)
    }

    /// Release the surface connection.
    pub async fn close(&mut self) -> Result<()> {
        self.surface.close().await
    }

    async fn scrape_breakdown(&mut self) -> Result<Vec<(String, u64)>> {
        let texts = self
            .surface
            .read_all_text(&self.options.selectors.amounts)
            .await?;
        let mut breakdown = Vec::with_capacity(texts.len());
        for (name, text) in self.mirror.names().zip(&texts) {
            let count = parse_count(text).map_err(|_| GameError::parse("upgrade amount", text.as_str()))?;
            breakdown.push((name.to_string(), count));
        }
        Ok(breakdown)
    }
}

/// Read the store labels into entries, skipping the blank label the page
/// renders after the last real one.
///
/// A name that appears twice keeps its first position but takes the rank and
/// price of its last label.
async fn scrape_catalog<S: GameSurface>(surface: &mut S, selectors: &Selectors) -> Result<Vec<UpgradeEntry>> {
    let labels = surface.read_all_text(&selectors.store_items).await?;
    let mut upgrades: Vec<UpgradeEntry> = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().filter(|l| !l.trim().is_empty()).enumerate() {
        let (name, price) = parse_store_label(label)?;
        let rank = i as u32 + 1;
        match upgrades.iter_mut().find(|u| u.name == name) {
            Some(existing) => {
                debug!(name = %existing.name, rank, price, "duplicate store label");
                existing.rank = rank;
                existing.price = price;
            }
            None => upgrades.push(UpgradeEntry { name, rank, price }),
        }
    }
    Ok(upgrades)
}

fn into_connection(err: GameError) -> GameError {
    match err {
        GameError::ElementNotFound(what) => GameError::Connection(format!("required element missing: {}", what)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror(prices: &[(&str, u64)]) -> GameMirror {
        GameMirror {
            money: 0,
            rate: 0.0,
            upgrades: prices
                .iter()
                .enumerate()
                .map(|(i, (name, price))| UpgradeEntry {
                    name: name.to_string(),
                    rank: i as u32 + 1,
                    price: *price,
                })
                .collect(),
        }
    }

    #[test]
    fn mirror_lookup_and_order() {
        let m = mirror(&[("Cursor", 15), ("Grandma", 100), ("Factory", 500)]);
        assert_eq!(m.get("Grandma").map(|u| u.price), Some(100));
        assert!(m.get("grandma").is_none());
        assert_eq!(m.names().collect::<Vec<_>>(), ["Cursor", "Grandma", "Factory"]);
    }

    #[test]
    fn options_report_path() {
        let mut options = SessionOptions::new("bot", 10);
        options.output_dir = PathBuf::from("runs");
        assert_eq!(options.report_path(), PathBuf::from("runs/bot_stats.txt"));
        assert!(options.show_numbers);
    }

    #[test]
    fn options_from_config() {
        let mut config = Config::default();
        config.session.name = "greedy".into();
        config.session.show_numbers = false;
        let options = SessionOptions::from(&config);
        assert_eq!(options.name, "greedy");
        assert_eq!(options.target, 25_000);
        assert!(!options.show_numbers);
        assert_eq!(options.report_path(), config.report_path());
    }

    #[test]
    fn missing_elements_become_connection_errors() {
        let err = into_connection(GameError::ElementNotFound("#store div b".into()));
        assert!(matches!(err, GameError::Connection(msg) if msg.contains("#store div b")));

        let err = into_connection(GameError::parse("count", "x"));
        assert!(matches!(err, GameError::Parse { .. }));
    }
}
