pub mod analysis;
pub mod trading;

/// Escape text for Telegram HTML mode.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn format_series(values: &[f64], n: usize, precision: usize) -> String {
    let start = values.len().saturating_sub(n);
    let parts: Vec<String> = values[start..]
        .iter()
        .map(|v| format!("{v:.precision$}"))
        .collect();
    format!("[{}]", parts.join(", "))
}
