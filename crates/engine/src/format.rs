// ABOUTME: Display formatting for metrics.
// ABOUTME: Groups integer digits in threes with ',' as en-US locale formatting does.

/// Formats a whole number with ',' between each group of three digits.
///
/// Any fractional part is rounded away first, ties away from zero. Works from the float's decimal
/// expansion, so values beyond the `i64` range keep every digit.
pub fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs().round());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0.0 && digits != "0" {
        out.push('-');
    }

    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
