use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://orteil.dashnet.org/experiments/cookie/";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub strategy: StrategyConfig,
    pub browser: BrowserConfig,
    pub selectors: Selectors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Bot name; also names the `{name}_stats.txt` report
    pub name: String,
    /// Cumulative production at which the run stops
    pub target: u64,
    /// Leave the page's floating click numbers switched on
    pub show_numbers: bool,
    /// Directory the report is written into
    pub output_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "simp_strat_bot".to_string(),
            target: 25_000,
            show_numbers: true,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyConfig {
    /// Seconds between decision points
    pub interval_secs: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self { interval_secs: 4.0 }
    }
}

impl StrategyConfig {
    /// The decision interval. Fails for negative, NaN or out-of-range values.
    pub fn interval(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.interval_secs).with_context(|| {
            format!(
                "strategy.interval_secs must be a finite number of seconds >= 0, got {}",
                self.interval_secs
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    pub url: String,
    pub headless: bool,
    /// Keep Chrome open after the report until Ctrl-C
    pub keep_open: bool,
    /// Explicit Chrome/Chromium executable; autodetected when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            headless: false,
            keep_open: false,
            chrome_path: None,
        }
    }
}

/// CSS selectors for every element the bot touches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub cookie: String,
    pub money: String,
    pub rate: String,
    /// Store labels in display order; the page always renders one empty trailing label
    pub store_items: String,
    /// Per-upgrade owned counts shown in the store
    pub amounts: String,
    pub toggle_numbers: String,
    /// Element id prefix for purchase controls (`buyCursor`, `buyTime machine`, ...)
    pub buy_prefix: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            cookie: "#cookie".to_string(),
            money: "#money".to_string(),
            rate: "#cps".to_string(),
            store_items: "#store div b".to_string(),
            amounts: ".amount".to_string(),
            toggle_numbers: "#toggleNumbers".to_string(),
            buy_prefix: "buy".to_string(),
        }
    }
}

impl Selectors {
    /// Selector for an upgrade's purchase control.
    ///
    /// Upgrade names may contain spaces, which an `#id` selector cannot
    /// express, so this uses an attribute match.
    pub fn buy(&self, upgrade: &str) -> String {
        let id = format!("{}{}", self.buy_prefix, upgrade);
        format!("[id=\"{}\"]", id.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl Config {
    /// Default config location: `~/.clickbot/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clickbot")
            .join("config.toml")
    }

    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would load fine but cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        self.strategy.interval()?;
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.session
            .output_dir
            .join(format!("{}_stats.txt", self.session.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.session.target, 25_000);
        assert_eq!(config.strategy.interval().unwrap(), Duration::from_secs(4));
        assert_eq!(config.browser.url, DEFAULT_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[session]\nname = \"fast\"\ntarget = 100\n\n[strategy]\ninterval_secs = 0.5\n",
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.session.name, "fast");
        assert_eq!(config.session.target, 100);
        assert!(config.session.show_numbers);
        assert_eq!(config.strategy.interval().unwrap(), Duration::from_millis(500));
        assert_eq!(config.selectors, Selectors::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.browser.headless = true;
        config.session.output_dir = PathBuf::from("/tmp/runs");
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(path)).unwrap(), config);
    }

    #[test]
    fn invalid_intervals_are_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let strategy = StrategyConfig { interval_secs: bad };
            let err = strategy.interval().unwrap_err();
            assert!(err.to_string().contains("strategy.interval_secs"), "{}", err);
        }
        assert_eq!(
            StrategyConfig { interval_secs: 0.0 }.interval().unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn validate_catches_negative_interval_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[strategy]\ninterval_secs = -2.5\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn buy_selector_handles_spaces() {
        let selectors = Selectors::default();
        assert_eq!(selectors.buy("Cursor"), "[id=\"buyCursor\"]");
        assert_eq!(selectors.buy("Time machine"), "[id=\"buyTime machine\"]");
    }

    #[test]
    fn report_path_uses_session_name() {
        let mut config = Config::default();
        config.session.output_dir = PathBuf::from("out");
        assert_eq!(config.report_path(), PathBuf::from("out/simp_strat_bot_stats.txt"));
    }
}
