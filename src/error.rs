//! Error taxonomy for talking to the game page.
//!
//! Nothing in the library retries or swallows these. A failure at any point
//! ends the run before the report is written.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a [`GameSurface`](crate::surface::GameSurface) or the
/// session built on top of it.
#[derive(Debug, Error)]
pub enum GameError {
    /// The page could not be reached, or a required element was missing at startup.
    #[error("could not connect to game page: {0}")]
    Connection(String),

    /// A control or display that used to exist is gone.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A purchase was requested for an upgrade the mirror does not know.
    #[error("no upgrade named {0:?} in the current catalog")]
    KeyNotFound(String),

    /// A number shown on the page did not parse.
    #[error("could not parse {what} from {text:?}")]
    Parse { what: &'static str, text: String },

    /// The upgrade breakdown could not be encoded as JSON.
    #[error("could not encode upgrade breakdown: {0}")]
    Breakdown(#[from] serde_json::Error),

    /// Writing or reading the stats artifact failed.
    #[error("stats file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GameError {
    pub(crate) fn parse(what: &'static str, text: impl Into<String>) -> Self {
        Self::Parse {
            what,
            text: text.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
