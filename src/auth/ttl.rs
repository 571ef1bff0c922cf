//! Human-readable credential lifetimes ("90", "15m", "1h", "7d").

use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TtlError {
    #[error("empty ttl")]
    Empty,
    #[error("invalid ttl amount in {0:?}")]
    InvalidAmount(String),
    #[error("unknown ttl unit {0:?}")]
    UnknownUnit(String),
    #[error("ttl must be greater than zero")]
    Zero,
}

/// Parse a lifetime such as `"1h"` into a [`Duration`].
///
/// A bare number is read as seconds. Supported units are `s`, `m`, `h`, `d` and `w`.
pub fn parse_ttl(input: &str) -> Result<Duration, TtlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TtlError::Empty);
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (amount, unit) = input.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| TtlError::InvalidAmount(input.to_string()))?;

    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        other => return Err(TtlError::UnknownUnit(other.to_string())),
    };

    let secs = amount
        .checked_mul(multiplier)
        .ok_or_else(|| TtlError::InvalidAmount(input.to_string()))?;
    if secs == 0 {
        return Err(TtlError::Zero);
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_ttl("90"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_ttl("15m"), Ok(Duration::from_secs(900)));
        assert_eq!(parse_ttl("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_ttl("7d"), Ok(Duration::from_secs(604_800)));
        assert_eq!(parse_ttl("2w"), Ok(Duration::from_secs(1_209_600)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_ttl(""), Err(TtlError::Empty));
        assert_eq!(parse_ttl("0h"), Err(TtlError::Zero));
        assert!(matches!(parse_ttl("h"), Err(TtlError::InvalidAmount(_))));
        assert!(matches!(parse_ttl("3y"), Err(TtlError::UnknownUnit(_))));
    }
}
