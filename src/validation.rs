use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;

const MAX_SYMBOL_LENGTH: usize = 44;
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Decodes a percent-encoded URL path segment into UTF-8 text.
pub fn decode_path_segment(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::ValidationError("Symbol is not valid UTF-8".to_string()))
}

/// Accepts ticker symbols and mint addresses. Tickers may use any script.
pub fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(Error::ValidationError("Symbol cannot be empty".to_string()));
    }
    if symbol.chars().count() > MAX_SYMBOL_LENGTH {
        return Err(Error::ValidationError(format!(
            "Symbol cannot be longer than {} characters",
            MAX_SYMBOL_LENGTH
        )));
    }
    if symbol.chars().any(char::is_control) {
        return Err(Error::ValidationError(
            "Symbol cannot contain control characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_limit(limit: Option<usize>) -> Result<Option<usize>> {
    match limit {
        Some(0) => Err(Error::ValidationError("limit must be a positive integer".to_string())),
        other => Ok(other),
    }
}

/// True when the identifier has the shape of a base58 Solana address.
pub fn looks_like_mint(identifier: &str) -> bool {
    (32..=44).contains(&identifier.len()) && identifier.chars().all(|c| BASE58_ALPHABET.contains(c))
}
