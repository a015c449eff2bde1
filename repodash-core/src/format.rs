//! Display formatting for cards, labels and table cells

use crate::model::Coverage;
use std::fmt::Display;

/// Placeholder for an absent scalar
pub const PLACEHOLDER: &str = "--";

/// Placeholder for absent coverage
pub const COVERAGE_UNAVAILABLE: &str = "N/A";

/// String form of a value, or `"--"` when absent
pub fn format_value<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render a `0..=1` ratio as a percentage with one decimal place
///
/// Exact ties round away from zero: `0.8125` is `"81.3%"`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", fixed_one(v * 100.0)),
        None => PLACEHOLDER.to_string(),
    }
}

// `{:.1}` rounds an exact tie to even. A double is an exact tie at one decimal
// only when it is an odd number of quarters (x = j/4, j odd).
fn fixed_one(x: f64) -> String {
    let quarters = x * 4.0;
    let is_tie = quarters.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if !is_tie {
        return format!("{:.1}", x);
    }
    let tenths = (x.abs() * 10.0).ceil();
    let sign = if x < 0.0 { "-" } else { "" };
    format!("{}{:.1}", sign, tenths / 10.0)
}

/// Coverage card text: the line rate as a percentage, or `"N/A"`
pub fn coverage_text(coverage: Option<&Coverage>) -> String {
    match coverage.and_then(Coverage::line_rate) {
        Some(rate) => format_percent(Some(rate)),
        None => COVERAGE_UNAVAILABLE.to_string(),
    }
}

pub fn snapshot_label(date: Option<&str>) -> String {
    match date.filter(|d| !d.is_empty()) {
        Some(d) => format!("Snapshot: {}", d),
        None => "Snapshot: unavailable".to_string(),
    }
}

/// Escape HTML special characters
pub fn escape_html<T: Display + ?Sized>(value: &T) -> String {
    let s = value.to_string();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
