//! Display formatting for recognition results

/// `0.873` -> `"87.3%"`
pub fn format_percent(fraction: f64) -> String {
    let fraction = if fraction.is_finite() { fraction } else { 0.0 };
    format!("{:.1}%", fraction * 100.0)
}

/// Stroke widths print without a trailing `.0`
pub fn format_width(width: f64) -> String {
    if width.fract() == 0.0 {
        format!("{}", width as i64)
    } else {
        format!("{}", width)
    }
}
