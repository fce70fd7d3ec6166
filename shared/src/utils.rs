// Ticker symbol helpers shared by the engine and its front ends.
use anyhow::{anyhow, Result};

pub const MIN_TICKER_LENGTH: usize = 1;
pub const MAX_TICKER_LENGTH: usize = 10;

/// Uppercased and trimmed symbol.
pub fn normalize_ticker(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Validates a symbol and returns its normalized form.
///
/// Length is counted without the `.`, `-` and `^` separators so that
/// symbols like `BRK.B` or `^NSEI` are measured by their letters.
pub fn validate_ticker(symbol: &str) -> Result<String> {
    let symbol = normalize_ticker(symbol);
    if symbol.is_empty() {
        return Err(anyhow!("Ticker cannot be empty"));
    }

    let significant = symbol.chars().filter(|c| !matches!(c, '.' | '-' | '^')).count();
    if significant < MIN_TICKER_LENGTH {
        return Err(anyhow!("Ticker too short"));
    }
    if significant > MAX_TICKER_LENGTH {
        return Err(anyhow!(
            "Ticker symbol too long (max {} characters excluding dots/hyphens/caret)",
            MAX_TICKER_LENGTH
        ));
    }

    if !symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^')) {
        return Err(anyhow!(
            "Ticker contains invalid characters (only letters, numbers, dots, hyphens, and ^ allowed)"
        ));
    }

    Ok(symbol)
}

/// Splits a comma-separated list into normalized, de-duplicated symbols,
/// keeping first-seen order.
pub fn parse_tickers(input: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for symbol in input.split(',').map(normalize_ticker) {
        if !symbol.is_empty() && !tickers.contains(&symbol) {
            tickers.push(symbol);
        }
    }
    tickers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ticker_accepts_separators() {
        assert_eq!(validate_ticker(" brk.b ").unwrap(), "BRK.B");
        assert_eq!(validate_ticker("^NSEI").unwrap(), "^NSEI");
        assert_eq!(validate_ticker("BRK-A").unwrap(), "BRK-A");
    }

    #[test]
    fn test_validate_ticker_rejects_bad_input() {
        assert!(validate_ticker("   ").unwrap_err().to_string().contains("empty"));
        assert!(validate_ticker("...").unwrap_err().to_string().contains("too short"));
        assert!(validate_ticker("ABCDEFGHIJK").unwrap_err().to_string().contains("too long"));
        assert!(validate_ticker("AA PL").unwrap_err().to_string().contains("invalid characters"));
        // Separators do not count towards the length limit
        assert!(validate_ticker("ABCDE.FGHIJ").is_ok());
    }

    #[test]
    fn test_parse_tickers() {
        assert_eq!(parse_tickers("aapl, msft,,AAPL , tsla"), vec!["AAPL", "MSFT", "TSLA"]);
        assert!(parse_tickers("  ").is_empty());
    }
}
