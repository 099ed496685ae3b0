//! Number formatting compatible with the table's historical display rules.

use std::sync::LazyLock;

use regex::Regex;

/// Leading decimal literal, as accepted by a lenient "parse the prefix" reader.
static LEADING_FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
        .expect("Invalid leading float regex")
});

/// Round `value` to `digits` decimals, exact ties away from zero.
///
/// The decision uses the exact binary value, so `1.005` (stored just below
/// the tie) rounds down while `0.25` rounds up.
///
/// ```
/// use ranktab_normalization::to_fixed;
///
/// assert_eq!(to_fixed(0.25, 1), "0.3");
/// assert_eq!(to_fixed(1.005, 2), "1.00");
/// assert_eq!(to_fixed(-0.04, 1), "-0.0");
/// assert_eq!(to_fixed(80.75, 1), "80.8");
/// ```
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return js_display(value);
    }
    let negative = value < 0.0;
    let expanded = format!("{:.*}", digits + 30, value.abs());
    let (int_part, frac_part) = expanded.split_once('.').unwrap_or((&expanded, ""));
    let (kept, rest) = frac_part.split_at(digits.min(frac_part.len()));

    let mut number: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if rest.as_bytes().first().is_some_and(|&b| b >= b'5') {
        increment_decimal(&mut number);
    }

    let split = number.len() - digits;
    let mut out = String::with_capacity(number.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&String::from_utf8_lossy(&number[..split]));
    if digits > 0 {
        out.push('.');
        out.push_str(&String::from_utf8_lossy(&number[split..]));
    }
    out
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest round-trip rendering: `71`, `1.5`, `0.3333333333333333`.
pub fn js_display(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Parse the longest numeric prefix of `raw` after leading whitespace.
pub fn leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let matched = LEADING_FLOAT_REGEX.find(trimmed)?;
    matched.as_str().parse::<f64>().ok()
}

fn strip_markers(raw: &str) -> String {
    raw.replacen('%', "", 1).replacen('?', "", 1)
}

/// True when the value, minus one `%` and one `?`, starts with a number.
pub fn is_numeric_value(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }
    leading_float(strip_markers(raw).trim()).is_some()
}

/// Display form of a single numeric value.
///
/// Integers are unchanged, fractions get one decimal, a `%` is kept.
/// Non-numeric text is returned as is.
pub fn format_numeric_value(raw: &str) -> String {
    if !is_numeric_value(raw) {
        return raw.to_string();
    }
    let Some(number) = leading_float(&strip_markers(raw)) else {
        return raw.to_string();
    };
    if raw.contains('%') {
        format!("{}%", js_display(number))
    } else if number == number.floor() {
        js_display(number)
    } else {
        to_fixed(number, 1)
    }
}
