//! Number formatting and the live stats screen printed at each decision point.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use crate::session::{GameMirror, RunStats};
use crate::theme as t;

/// Group an integer with commas: `1234567` becomes `"1,234,567"`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed variant of [`thousands`], for "remaining" counts that can go negative.
pub fn thousands_signed(value: i128) -> String {
    let grouped = thousands(value.unsigned_abs().min(u64::MAX as u128) as u64);
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Elapsed time as zero-padded `MM:SS`. Minutes do not roll over into hours.
pub fn digital_elapsed_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Events per second, zero before any time has passed.
pub fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

/// Render the stats screen shown between decision points.
pub fn render_stats(stats: &RunStats, mirror: &GameMirror, target: u64, elapsed: Duration) -> String {
    let remaining = target as i128 - stats.produced as i128;
    let rule = t::muted(&"-".repeat(40));
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "time elapsed: {} ({:.2} secs)\n",
        t::accent(&digital_elapsed_time(elapsed)),
        elapsed.as_secs_f64()
    ));
    out.push_str(&format!(
        "total webdriver clicks: {} ({:.2} clicks/s)\n",
        t::info(&thousands(stats.clicks)),
        per_second(stats.clicks, elapsed)
    ));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("target cookies to generate: {}\n", thousands(target)));
    out.push_str(&format!(
        "total cookies generated: {} ({} remaining)\n",
        t::success(&thousands(stats.produced)),
        thousands_signed(remaining)
    ));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("current cookies: {}\n", t::info(&thousands(mirror.money))));
    out.push_str(&format!(
        "upgrades bought: {} ({} cookies spent)\n",
        stats.purchases,
        thousands(stats.spent)
    ));
    out.push_str(&format!("cookies/second value: {:?}\n", mirror.rate));
    out
}

/// Where the stats screen and the final report are printed.
///
/// The terminal is cleared before each screen only when writing to a stdout
/// that is a terminal.
pub struct Screen {
    out: Box<dyn Write + Send>,
    clear: bool,
}

impl Screen {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let clear = out.is_terminal();
        Self {
            out: Box::new(out),
            clear,
        }
    }

    /// Print into `out` instead, never clearing.
    pub fn writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            clear: false,
        }
    }

    /// Replace whatever was shown last with `text`. Write errors are ignored.
    pub fn show(&mut self, text: &str) {
        if self.clear {
            let _ = write!(self.out, "\x1B[2J\x1B[1;1H");
        }
        let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen").field("clear", &self.clear).finish_non_exhaustive()
    }
}
