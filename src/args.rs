use crate::config::Config;
use clap::{ArgAction, Args};
use std::path::PathBuf;

// Global flags shared across every subcommand. Each one overrides the
// matching config-file value when given.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to a config.toml file (default: ~/.clickbot/config.toml)
    #[arg(
        short = 'c',
        long,
        value_name = "PATH",
        env = "CLICKBOT_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Bot name; the report is written to <NAME>_stats.txt
    #[arg(long, value_name = "NAME", env = "CLICKBOT_NAME", global = true)]
    pub name: Option<String>,

    /// Cumulative cookies to produce before stopping
    #[arg(long, value_name = "COOKIES", env = "CLICKBOT_TARGET", global = true)]
    pub target: Option<u64>,

    /// Seconds between decision points
    #[arg(long, value_name = "SECS", global = true)]
    pub interval: Option<f64>,

    /// Switch off the page's floating click numbers
    #[arg(long = "hide-numbers", action = ArgAction::SetTrue, global = true)]
    pub hide_numbers: bool,

    /// Run Chrome without a window
    #[arg(long, action = ArgAction::SetTrue, env = "CLICKBOT_HEADLESS", global = true)]
    pub headless: bool,

    /// Keep the browser open after the report until Ctrl-C
    #[arg(long = "keep-open", action = ArgAction::SetTrue, global = true)]
    pub keep_open: bool,

    /// Directory for the stats report
    #[arg(long, value_name = "DIR", env = "CLICKBOT_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Game URL
    #[arg(long, value_name = "URL", env = "CLICKBOT_URL", global = true)]
    pub url: Option<String>,

    /// Disable coloured terminal output
    #[arg(long = "no-color", action = ArgAction::SetTrue, env = "NO_COLOR", global = true)]
    pub no_color: bool,

    /// Debug-level logging
    #[arg(short = 'v', long, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(name) = &self.name {
            config.session.name = name.clone();
        }

        if let Some(target) = self.target {
            config.session.target = target;
        }

        if let Some(interval) = self.interval {
            config.strategy.interval_secs = interval;
        }

        if self.hide_numbers {
            config.session.show_numbers = false;
        }

        if self.headless {
            config.browser.headless = true;
        }

        if self.keep_open {
            config.browser.keep_open = true;
        }

        if let Some(dir) = &self.output_dir {
            config.session.output_dir = dir.clone();
        }

        if let Some(url) = &self.url {
            config.browser.url = url.clone();
        }
    }
}
