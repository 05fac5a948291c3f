use std::fmt::Write;

const MAX_FRACTION_DIGITS: usize = 3;
const FRACTION_SCALE: f64 = 1000.0;

/// Group a number the way `toLocaleString("en-US")` does: comma thousands
/// separators and up to three fraction digits.
pub fn group_thousands(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_owned();
    }

    let fixed = scaled_digits(value.abs());
    let (int_part, frac_part) = fixed.split_at(fixed.len() - MAX_FRACTION_DIGITS);
    let frac_part = frac_part.trim_end_matches('0');
    let is_zero = frac_part.is_empty() && int_part.bytes().all(|b| b == b'0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    push_grouped(&mut out, int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Magnitude scaled to thousandths and rounded half away from zero (ICU's
/// `halfExpand`), as a digit string of at least `MAX_FRACTION_DIGITS + 1` digits.
fn scaled_digits(magnitude: f64) -> String {
    let scaled = (magnitude * FRACTION_SCALE).round();
    let digits = if scaled.is_finite() {
        format!("{scaled:.0}")
    } else {
        format!("{magnitude:.0}{}", "0".repeat(MAX_FRACTION_DIGITS))
    };
    format!("{digits:0>width$}", width = MAX_FRACTION_DIGITS + 1)
}

fn push_grouped(out: &mut String, digits: &str) {
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
}

/// Dollar amount, e.g. `$1,500,000` or `-$2,500`.
pub fn format_currency(value: f64) -> String {
    let grouped = group_thousands(value);
    let mut out = String::with_capacity(grouped.len() + 2);
    match grouped.strip_prefix('-') {
        Some(magnitude) => {
            let _ = write!(out, "-${magnitude}");
        }
        None => {
            let _ = write!(out, "${grouped}");
        }
    }
    out
}
