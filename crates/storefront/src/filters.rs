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

/// Returns `"s"` unless the count is exactly one.
///
/// Usage in templates: `{{ count }} item{{ count|plural_s }}`
#[askama::filter_fn]
pub fn plural_s(count: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(plural_suffix(&count.to_string()))
}

fn plural_suffix(count: &str) -> &'static str {
    if count.trim() == "1" { "" } else { "s" }
}
