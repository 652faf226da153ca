//! Lenient parsing of computed pixel lengths.
//!
//! The annotation engine reads box-edge metrics as resolved style strings
//! (`"4px"`, `"2.5px"`, occasionally keywords like `"auto"` or `"medium"`).
//! Every geometry computation needs all of its metrics at once, so a value
//! that fails to parse must coerce to zero rather than propagate an error.

/// Parse the leading integer of a computed length, `parseInt`-style.
///
/// Mirrors ECMAScript `parseInt` applied to a computed style value:
/// optional sign, then as many ASCII digits as follow; everything after
/// (including a fractional part and the `px` unit) is ignored, so
/// `"4.7px"` parses as `4`. Anything without a leading integer — the
/// empty string, `"auto"`, `"medium"` — yields `0`.
#[must_use]
pub fn parse_px(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i32>().map_or(0, |n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::parse_px;

    #[test]
    fn plain_pixel_values() {
        assert_eq!(parse_px("4px"), 4);
        assert_eq!(parse_px("0px"), 0);
        assert_eq!(parse_px("150px"), 150);
    }

    #[test]
    fn fractional_remainder_is_truncated() {
        assert_eq!(parse_px("4.7px"), 4);
        assert_eq!(parse_px("0.5px"), 0);
    }

    #[test]
    fn negative_margins() {
        assert_eq!(parse_px("-8px"), -8);
        assert_eq!(parse_px("-2.9px"), -2);
    }

    #[test]
    fn unparseable_values_coerce_to_zero() {
        assert_eq!(parse_px(""), 0);
        assert_eq!(parse_px("auto"), 0);
        assert_eq!(parse_px("medium"), 0);
        assert_eq!(parse_px("px"), 0);
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        assert_eq!(parse_px("  12px"), 12);
    }
}
