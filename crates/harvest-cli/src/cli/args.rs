//! Comma-separated list flags.

use anyhow::Result;

/// Split a comma-separated location list, trimming whitespace and dropping empty entries.
pub fn parse_locations(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated year list, keeping only years within `[min_year, max_year]`.
/// Entries that are not integers or fall outside the range are dropped with a warning.
pub fn parse_years(list: &str, min_year: i32, max_year: i32) -> Result<Vec<i32>> {
    let mut years = Vec::new();
    for part in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match part.parse::<i32>() {
            Ok(y) if (min_year..=max_year).contains(&y) => years.push(y),
            _ => tracing::warn!(
                "ignoring year {:?} (expected {}-{})",
                part,
                min_year,
                max_year
            ),
        }
    }
    if years.is_empty() {
        anyhow::bail!(
            "no valid years in {:?} (expected {}-{})",
            list,
            min_year,
            max_year
        );
    }
    Ok(years)
}
