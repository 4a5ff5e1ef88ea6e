use super::error::{AppError, Result};

/// Parse a `#RRGGBB` hex color string.
pub fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    let digits = s
        .strip_prefix('#')
        .ok_or_else(|| AppError::InvalidColor(s.to_string()))?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(AppError::InvalidColor(s.to_string()));
    }
    let byte = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| AppError::InvalidColor(s.to_string()))
    };
    Ok((byte(0..2)?, byte(2..4)?, byte(4..6)?))
}

/// Format an RGB triple as `#RRGGBB`.
pub fn format_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Perceived brightness on the 0-255 scale (ITU-R BT.601 weights).
pub fn luminance((r, g, b): (u8, u8, u8)) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// True when text drawn over this color needs a light foreground.
/// Single contrast rule for every color-against-background decision.
pub fn is_dark(rgb: (u8, u8, u8)) -> bool {
    luminance(rgb) < 128.0
}

/// `is_dark` for hex strings. Malformed input counts as dark so chrome
/// painted from an unvalidated string degrades to a light foreground.
pub fn is_dark_hex(hex: &str) -> bool {
    parse_hex(hex).map(is_dark).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_hex("#000000").unwrap(), (0, 0, 0));
        assert_eq!(parse_hex("#FFFFFF").unwrap(), (255, 255, 255));
        assert_eq!(parse_hex("#2196F3").unwrap(), (0x21, 0x96, 0xF3));
        assert_eq!(parse_hex("#aabbcc").unwrap(), (0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "123456", "#12345", "#1234567", "#GGHHII", "blue"] {
            assert!(
                matches!(parse_hex(bad), Err(AppError::InvalidColor(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_format_round_trip() {
        for hex in ["#000000", "#AABBCC", "#2196F3"] {
            assert_eq!(format_hex(parse_hex(hex).unwrap()), hex);
        }
    }

    #[test]
    fn test_luminance_threshold() {
        // 0.299*128 + 0.587*128 + 0.114*128 == 128, right at the cutoff
        assert!(!is_dark((128, 128, 128)));
        assert!(is_dark((127, 127, 127)));
        assert!(is_dark((0, 0, 0)));
        assert!(!is_dark((255, 255, 255)));
        // Saturated green reads bright, saturated blue reads dark
        assert!(!is_dark((0, 255, 0)));
        assert!(is_dark((0, 0, 255)));
    }

    #[test]
    fn test_is_dark_hex_fallback() {
        assert!(is_dark_hex("#222222"));
        assert!(!is_dark_hex("#FFEB3B"));
        assert!(is_dark_hex("not-a-color"));
    }
}
