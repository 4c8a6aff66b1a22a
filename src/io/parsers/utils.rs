use std::str::FromStr;

/// Parse a single TSV column, ignoring surrounding whitespace.
pub fn parse_column<T: FromStr>(column: &str) -> Result<T, <T as FromStr>::Err> {
    // NOTE: this is used a lot, and should be benchmarked.
    column.trim().parse::<T>()
}

/// Whether a column is made only of ASCII digits, i.e. looks like a position.
pub fn is_position_like(column: &str) -> bool {
    let column = column.trim();
    !column.is_empty() && column.bytes().all(|b| b.is_ascii_digit())
}

/// Whether a line (or its first column) is a BED `track` or `browser` line,
/// which carries display settings rather than a range.
pub fn is_bed_metadata_line(line: &str) -> bool {
    let mut words = line.split_whitespace();
    matches!(words.next(), Some("track") | Some("browser"))
}
