//! Display formatting for metric cards.

/// Shown in place of a value when no record backs the metric.
pub const PLACEHOLDER: &str = "--";

pub const DEFAULT_GROUPING_SEPARATOR: char = ',';

/// `8547` -> `8,547` with `sep` between thousands groups.
pub fn group_digits(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Grouped integer with an explicit sign: `+1,000`, `-1,203`, `0`.
pub fn signed_grouped(n: i64, sep: char) -> String {
    let grouped = group_digits(n.unsigned_abs(), sep);
    match n.signum() {
        1 => format!("+{grouped}"),
        -1 => format!("-{grouped}"),
        _ => grouped,
    }
}

/// Whole minutes as `{h}h {m}m`.
pub fn hours_minutes(total_minutes: i64) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}
