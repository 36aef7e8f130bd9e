//! `delay` field parsing.

use std::time::Duration;

use crate::error::GatewayError;

/// Longest accepted delay.
pub const MAX_DELAY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Parse a delay: `<n>` or `<n>sec`/`<n>secs` seconds, or any humantime
/// duration such as `500ms` or `1h 30m`.
pub fn parse_delay(raw: &str) -> Result<Duration, GatewayError> {
    let trimmed = raw.trim();
    let seconds = trimmed
        .strip_suffix("secs")
        .or_else(|| trimmed.strip_suffix("sec"))
        .unwrap_or(trimmed);
    let delay = match seconds.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(trimmed)
            .map_err(|_| GatewayError::bad_request(format!("invalid delay '{}'", raw)))?,
    };

    if delay > MAX_DELAY {
        return Err(GatewayError::bad_request(format!(
            "delay '{}' exceeds {}",
            raw,
            humantime::format_duration(MAX_DELAY)
        )));
    }
    Ok(delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_forms() {
        assert_eq!(parse_delay("0sec").unwrap(), Duration::ZERO);
        assert_eq!(parse_delay("10sec").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_delay("3secs").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_delay("42").unwrap(), Duration::from_secs(42));
    }

    #[test]
    fn test_humantime_forms() {
        assert_eq!(parse_delay("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_delay("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_delay("1h 30m").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_delay_upper_bound() {
        assert_eq!(parse_delay("30days").unwrap(), MAX_DELAY);
        for raw in ["18446744073709551615", "2592001sec", "31days", "100years"] {
            let err = parse_delay(raw).unwrap_err();
            assert!(matches!(err, GatewayError::BadRequest(_)), "{:?}", raw);
        }
    }

    #[test]
    fn test_invalid_delay() {
        for raw in ["soon", "-1", "", "sec", "1.5.2s"] {
            let err = parse_delay(raw).unwrap_err();
            assert!(matches!(err, GatewayError::BadRequest(_)), "{:?}", raw);
        }
    }
}
