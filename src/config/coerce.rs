//! Coercion of stored strings into typed values
//!
//! Every function here is total. Malformed input falls back to a documented
//! value instead of failing, so a read never interrupts the caller.
//!
//! - Integers: the leading decimal number, as for floats, truncated toward
//!   zero. Without a fraction or exponent only the sign and digit run are
//!   read. No digits yields `0`. Out-of-range values saturate.
//! - Floats: optional leading whitespace, then the longest prefix of the form
//!   `[+-]?(digits[.digits] | .digits)([eE][+-]?digits)?`. No such prefix
//!   yields `0.0`.
//! - Booleans: `1`, `true`, `on`, `yes` (case-insensitive) are true; anything
//!   else, including the empty string, is false.
//! - Lists: comma separated, each piece trimmed, empty pieces kept.

/// Values treated as `true` by [`parse_bool`]
pub const TRUTHY: &[&str] = &["1", "true", "on", "yes"];

/// Parse the leading integer of `value`.
///
/// A leading number with a fraction or exponent is read as a float and
/// truncated toward zero, so `"1.5e3"` is `1500`.
pub fn parse_int(value: &str) -> i64 {
    let s = value.trim_start();
    let prefix = &s[..float_prefix_len(s.as_bytes())];
    if prefix.contains(['.', 'e', 'E']) {
        // `as` truncates toward zero and saturates at the i64 bounds
        return prefix.parse::<f64>().map_or(0, |f| f as i64);
    }

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut result: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit)
        } else {
            result.saturating_mul(10).saturating_add(digit)
        };
    }
    result
}

/// Parse the leading decimal number of `value`
pub fn parse_float(value: &str) -> f64 {
    let s = value.trim_start();
    let len = float_prefix_len(s.as_bytes());
    if len == 0 {
        return 0.0;
    }
    s[..len].parse().unwrap_or(0.0)
}

/// Length of the longest prefix of `bytes` that forms a decimal float literal
fn float_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = digits_from(pos);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = digits_from(pos + 1);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    pos
}

/// Interpret `value` as a boolean flag
pub fn parse_bool(value: &str) -> bool {
    let lower = value.to_lowercase();
    TRUTHY.contains(&lower.as_str())
}

/// Split a comma separated list, trimming each element
pub fn parse_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}
