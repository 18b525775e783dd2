//! The end-of-run stats file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::display::{digital_elapsed_time, per_second, thousands};
use crate::error::{GameError, Result};
use crate::session::RunStats;

pub const HEADER: &str = "FINAL STATISTICS:";
pub const BREAKDOWN_HEADER: &str = "UPGRADES BREAKDOWN:";

/// Snapshot of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub stats: RunStats,
    pub elapsed: Duration,
    pub final_rate: f64,
    /// Owned count per upgrade, in store order
    pub breakdown: Vec<(String, u64)>,
}

/// Serializes as a JSON object whose keys keep store order.
struct Breakdown<'a>(&'a [(String, u64)]);

impl Serialize for Breakdown<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl Report {
    pub fn render(&self) -> Result<String> {
        let stats = &self.stats;
        let breakdown = serde_json::to_string_pretty(&Breakdown(&self.breakdown))?;

        let mut out = String::from(HEADER);
        out.push_str(&format!(
            "\n\n- '{}' generated {} cookies in {}.",
            self.name,
            thousands(stats.produced),
            digital_elapsed_time(self.elapsed)
        ));
        out.push_str(&format!(
            "\n- {} upgrades were bought from spending {} cookies.",
            stats.purchases,
            thousands(stats.spent)
        ));
        out.push_str(&format!(
            "\n- The final 'cookies/second' rate value reached was {:?} clicks/s.",
            self.final_rate
        ));
        out.push_str(&format!(
            "\n- {} total webdriver clicks were processed ({:.2} clicks/s).",
            thousands(stats.clicks),
            per_second(stats.clicks, self.elapsed)
        ));
        out.push_str("\n\n");
        out.push_str(BREAKDOWN_HEADER);
        out.push('\n');
        out.push_str(&breakdown);
        Ok(out)
    }

    /// Write the report to `path`, replacing any earlier file, and return the
    /// contents as read back from disk.
    pub fn persist(&self, path: &Path) -> Result<String> {
        let io_err = |source: std::io::Error| GameError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = self.render()?;
        fs::write(path, contents).map_err(io_err)?;
        fs::read_to_string(path).map_err(io_err)
    }
}
