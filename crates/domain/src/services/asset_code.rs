//! Asset code generation.
//!
//! Codes look like `E-EC-2025-007`: category prefix, intake year and a
//! three-digit sequence that restarts every year for each prefix.

use crate::models::AssetCategory;

/// `LIKE` pattern matching every code of `category` in `year`.
pub fn code_pattern(category: AssetCategory, year: i32) -> String {
    format!("{}-{}-%", category.code_prefix(), year)
}

/// Code following `last_sequence` for `category` in `year`.
pub fn next_asset_code(category: AssetCategory, year: i32, last_sequence: Option<i32>) -> String {
    let next = last_sequence.unwrap_or(0).max(0) + 1;
    format!("{}-{}-{:03}", category.code_prefix(), year, next)
}
