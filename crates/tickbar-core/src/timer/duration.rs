use crate::error::ValidationError;

/// Parse a human duration into seconds.
///
/// Accepts unit groups `h`, `m`, `s` in any combination (`1h30m`, `90s`,
/// `2m30s`) and a bare number, which means minutes. Zero is rejected.
pub fn parse_duration(input: &str) -> Result<u64, ValidationError> {
    let text = input.trim().to_ascii_lowercase();
    let invalid = || ValidationError::InvalidDuration(input.trim().to_string());

    if text.is_empty() {
        return Err(invalid());
    }

    let total = if text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse::<u64>()
            .map_err(|_| invalid())?
            .checked_mul(60)
            .ok_or_else(invalid)?
    } else {
        let mut total: u64 = 0;
        let mut digits = String::new();
        for c in text.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return Err(invalid()),
            };
            if digits.is_empty() {
                return Err(invalid());
            }
            let value: u64 = digits.parse().map_err(|_| invalid())?;
            total = value
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(invalid)?;
            digits.clear();
        }
        if !digits.is_empty() {
            // Trailing number without a unit, e.g. "1h30".
            return Err(invalid());
        }
        total
    };

    if total == 0 {
        return Err(invalid());
    }
    Ok(total)
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unit_groups() {
        assert_eq!(parse_duration("90s"), Ok(90));
        assert_eq!(parse_duration("10m"), Ok(600));
        assert_eq!(parse_duration("1h"), Ok(3600));
        assert_eq!(parse_duration("1h30m"), Ok(5400));
        assert_eq!(parse_duration("2m30s"), Ok(150));
        assert_eq!(parse_duration(" 1H5M "), Ok(3900));
    }

    #[test]
    fn bare_number_is_minutes() {
        assert_eq!(parse_duration("25"), Ok(1500));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "10x", "h", "1h30", "0", "0m", "-5m"] {
            assert_eq!(
                parse_duration(bad),
                Err(ValidationError::InvalidDuration(bad.trim().to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_duration("99999999999999999999h").is_err());
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.9), "00:59");
        assert_eq!(format_clock(1500.0), "25:00");
        assert_eq!(format_clock(3725.0), "01:02:05");
        assert_eq!(format_clock(-3.0), "00:00");
    }
}
