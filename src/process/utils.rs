/// Trim whitespace, a leading UTF-8 BOM and outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a year column header like `"1960"`.
/// Returns `None` for anything that isn't a plain four-digit year.
pub fn parse_year(header: &str) -> Option<i32> {
    let s = clean_str(header);
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a ratio cell. Empty, unparsable and non-finite cells are missing.
pub fn parse_value(cell: &str) -> Option<f64> {
    let s = clean_str(cell);
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
