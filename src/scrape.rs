//! Parsers for the text the game page renders.
//!
//! The page formats every number for humans (`"1,234"`, `"per second : 0.5"`,
//! `"Time machine - 123,456"`), so each reader here strips that formatting
//! back off and reports the raw text on failure.

use crate::error::{GameError, Result};

/// Parse one store label into `(name, price)`.
///
/// Labels look like `"Cursor - 15"` or `"Time machine - 1,234,567"`: the name is
/// every token except the trailing `"-"` and price.
pub fn parse_store_label(label: &str) -> Result<(String, u64)> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(GameError::parse("store entry", label));
    }
    let name = tokens[..tokens.len() - 2].join(" ");
    let price = parse_count(tokens[tokens.len() - 1])
        .map_err(|_| GameError::parse("store price", label))?;
    Ok((name, price))
}

/// Parse a comma-grouped integer such as `"12,345"`.
pub fn parse_count(text: &str) -> Result<u64> {
    let cleaned = text.trim().replace(',', "");
    cleaned
        .parse::<u64>()
        .map_err(|_| GameError::parse("count", text))
}

/// Parse the production-rate display, e.g. `"per second : 1,204.5"`.
pub fn parse_rate(text: &str) -> Result<f64> {
    let last = text
        .split_whitespace()
        .last()
        .ok_or_else(|| GameError::parse("rate", text))?;
    last.replace(',', "")
        .parse::<f64>()
        .map_err(|_| GameError::parse("rate", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_label_with_multiword_name() {
        let (name, price) = parse_store_label("Time machine - 123,456").unwrap();
        assert_eq!(name, "Time machine");
        assert_eq!(price, 123_456);
    }

    #[test]
    fn store_label_collapses_whitespace() {
        let (name, price) = parse_store_label("  Alchemy   lab -  50,000 ").unwrap();
        assert_eq!(name, "Alchemy lab");
        assert_eq!(price, 50_000);
    }

    #[test]
    fn store_label_rejects_garbage() {
        assert!(matches!(
            parse_store_label("Cursor"),
            Err(GameError::Parse { .. })
        ));
        assert!(matches!(
            parse_store_label("Cursor - fifteen"),
            Err(GameError::Parse { what: "store price", .. })
        ));
    }

    #[test]
    fn counts_and_rates() {
        assert_eq!(parse_count("1,234,567").unwrap(), 1_234_567);
        assert_eq!(parse_count(" 0 ").unwrap(), 0);
        assert!(parse_count("").is_err());
        assert!(parse_count("-3").is_err());

        assert_eq!(parse_rate("per second : 12.5").unwrap(), 12.5);
        assert_eq!(parse_rate("per second : 1,204").unwrap(), 1204.0);
        assert!(parse_rate("per second :").is_err());
        assert!(parse_rate("").is_err());
    }
}
