//! Terminal colours and the launch spinner.
//!
//! Respects the `NO_COLOR` env-var and the `--no-color` CLI flag.
//!
//! | Token   | Hex       | Usage                           |
//! |---------|-----------|---------------------------------|
//! | accent  | `#C8842D` | headings, elapsed time          |
//! | info    | `#E8B86D` | live counters                   |
//! | success | `#2FBF71` | production totals, ok states    |
//! | error   | `#E23D2D` | failures                        |
//! | muted   | `#8B7F77` | rules, metadata                 |

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// ── Global color toggle ─────────────────────────────────────────────────────

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable colour for the rest of the process.
pub fn disable_color() {
    COLOR_DISABLED.store(true, Ordering::Relaxed);
    colored::control::set_override(false);
}

/// Call once at startup with the `--no-color` flag; also honours `NO_COLOR`.
pub fn init_color(no_color_flag: bool) {
    if no_color_flag
        || std::env::var("NO_COLOR")
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    {
        disable_color();
    }
}

fn is_color() -> bool {
    !COLOR_DISABLED.load(Ordering::Relaxed)
}

pub mod palette {
    pub const ACCENT: (u8, u8, u8) = (0xC8, 0x84, 0x2D);
    pub const INFO: (u8, u8, u8) = (0xE8, 0xB8, 0x6D);
    pub const SUCCESS: (u8, u8, u8) = (0x2F, 0xBF, 0x71);
    pub const ERROR: (u8, u8, u8) = (0xE2, 0x3D, 0x2D);
    pub const MUTED: (u8, u8, u8) = (0x8B, 0x7F, 0x77);
}

fn apply(text: &str, rgb: (u8, u8, u8)) -> String {
    if is_color() {
        text.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        text.to_string()
    }
}

pub fn accent(text: &str) -> String {
    apply(text, palette::ACCENT)
}

pub fn info(text: &str) -> String {
    apply(text, palette::INFO)
}

pub fn success(text: &str) -> String {
    apply(text, palette::SUCCESS)
}

pub fn error(text: &str) -> String {
    apply(text, palette::ERROR)
}

pub fn muted(text: &str) -> String {
    apply(text, palette::MUTED)
}

/// Green ✓
pub fn icon_ok(label: &str) -> String {
    format!("{} {}", success("✓"), label)
}

/// Red ✗
pub fn icon_fail(label: &str) -> String {
    format!("{} {}", error("✗"), label)
}

// ── Spinner ─────────────────────────────────────────────────────────────────

const SPINNER_CHARS: &[&str] = &["◒", "◐", "◓", "◑"];

/// Indeterminate spinner; finish it with [`spinner_ok`] or [`spinner_fail`].
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = if is_color() {
        "{spinner:.yellow}  {msg}"
    } else {
        "{spinner}  {msg}"
    };
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(SPINNER_CHARS);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spinner_ok(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(icon_ok(message));
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(icon_fail(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_output() {
        disable_color();
        assert_eq!(accent("hello"), "hello");
        assert_eq!(success("ok"), "ok");
        assert_eq!(muted("---"), "---");
        assert_eq!(icon_ok("done"), "✓ done");
        assert_eq!(icon_fail("bad"), "✗ bad");
    }
}
