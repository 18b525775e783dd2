//! Plays the Cookie Clicker experiment page through a real browser.
//!
//! A [`GameSession`](session::GameSession) owns the page connection and a
//! mirror of what the page shows; a [`StrategyLoop`](strategy::StrategyLoop)
//! clicks, refreshes on a fixed cadence and buys upgrades until the target is
//! reached, then writes a stats report.

pub mod args;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod report;
pub mod scrape;
pub mod session;
pub mod strategy;
pub mod surface;
pub mod theme;

pub use error::{GameError, Result};
pub use report::Report;
pub use session::{GameMirror, GameSession, RunStats, SessionOptions, UpgradeEntry};
pub use strategy::{StrategyLoop, select_upgrade};
pub use surface::GameSurface;
