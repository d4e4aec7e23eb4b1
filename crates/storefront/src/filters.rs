//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Spanish piece count, e.g. `1 pieza` or `12 piezas`.
///
/// Usage in templates: `{{ products.len()|pieces }}`
#[askama::filter_fn]
pub fn pieces(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(pieces_label(&count.to_string()))
}

fn pieces_label(count: &str) -> String {
    if count == "1" {
        "1 pieza".to_string()
    } else {
        format!("{count} piezas")
    }
}
