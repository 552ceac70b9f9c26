//! Parser for multi-day hourly traffic-count tables.
//!
//! Layout: `id, col1, road, col3, col4, col5, col6, hour0, ..., hour23`.
//! The first non-blank line is a header and is discarded. Lines end at `\n`
//! (a trailing `\r` is tolerated); fields are split on bare commas and quotes
//! are not treated as escapes.

use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::{debug, warn};

use crate::analyzers::types::{HOURS, HourlyProfile, RawDailyRecord};
use crate::error::ParseError;
use crate::normalize::normalize;

/// Column holding the road name.
pub const ROAD_COLUMN: usize = 2;
/// Column of the first hourly count.
pub const FIRST_HOUR_COLUMN: usize = 7;
/// Id column + six metadata columns + 24 hourly columns.
pub const MIN_COLUMNS: usize = FIRST_HOUR_COLUMN + HOURS;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Normalize road names into matching keys instead of just trimming them.
    pub normalize_names: bool,
    /// Reject a header narrower than [`MIN_COLUMNS`].
    pub strict_header: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize_names: true,
            strict_header: false,
        }
    }
}

/// Records read from a table, plus the number of rows that were too narrow.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedTable {
    pub records: Vec<RawDailyRecord>,
    pub skipped_rows: usize,
}

/// Parses table text into daily records.
///
/// Narrow rows are skipped and unparseable counts become 0.0.
///
/// # Errors
///
/// Returns [`ParseError::NarrowHeader`] only in strict-header mode, and
/// [`ParseError::Csv`] if the underlying reader fails.
pub fn parse_counts(text: &str, options: &ParseOptions) -> Result<ParsedTable, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut table = ParsedTable::default();
    let mut seen_header = false;

    for result in rdr.records() {
        let row = result?;
        if is_blank(&row) {
            continue;
        }

        if !seen_header {
            seen_header = true;
            if options.strict_header && row.len() < MIN_COLUMNS {
                return Err(ParseError::NarrowHeader {
                    found: row.len(),
                    required: MIN_COLUMNS,
                });
            }
            continue;
        }

        match parse_row(&row, options) {
            Some(record) => table.records.push(record),
            None => {
                debug!(columns = row.len(), "Skipping narrow row");
                table.skipped_rows += 1;
            }
        }
    }

    if table.records.is_empty() {
        warn!("Traffic count table is empty or missing data rows");
    } else {
        debug!(
            records = table.records.len(),
            skipped = table.skipped_rows,
            "Parsed traffic count table"
        );
    }

    Ok(table)
}

fn parse_row(row: &StringRecord, options: &ParseOptions) -> Option<RawDailyRecord> {
    if row.len() < MIN_COLUMNS {
        return None;
    }

    let raw_name = unquote(row.get(ROAD_COLUMN)?.trim());
    let road_name = if options.normalize_names {
        normalize(raw_name)
    } else {
        raw_name.trim().to_string()
    };

    let mut hourly = HourlyProfile::default();
    for (h, slot) in hourly.0.iter_mut().enumerate() {
        *slot = row
            .get(FIRST_HOUR_COLUMN + h)
            .map(parse_count)
            .unwrap_or(0.0);
    }

    Some(RawDailyRecord {
        road_name,
        hourly_counts: hourly,
    })
}

/// Parses one hourly cell. Anything that is not a finite number counts as 0.0.
pub fn parse_count(cell: &str) -> f64 {
    unquote(cell.trim())
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Strips one pair of wrapping double quotes.
fn unquote(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

/// A whitespace-only line. A line of bare commas still has columns.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(|line| line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut cols = vec!["ID", "Segment", "Roadway", "From", "To", "Direction", "Date"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        for h in 0..HOURS {
            cols.push(format!("H{h}"));
        }
        cols.join(",")
    }

    fn row(id: u32, road: &str, counts: &[f64]) -> String {
        let mut cols = vec![id.to_string(), String::new(), road.to_string()];
        cols.extend(std::iter::repeat_n(String::new(), 4));
        cols.extend(counts.iter().map(|c| c.to_string()));
        cols.join(",")
    }

    fn flat(value: f64) -> Vec<f64> {
        vec![value; HOURS]
    }

    #[test]
    fn test_parse_empty_text() {
        let table = parse_counts("", &ParseOptions::default()).unwrap();
        assert!(table.records.is_empty());
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_parse_header_only() {
        let text = format!("{}\n\n   \n", header());
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert!(table.records.is_empty());
    }

    #[test]
    fn test_parse_single_row_normalized() {
        let text = format!("{}\n{}\n", header(), row(1, "Main St", &flat(12.5)));
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();

        assert_eq!(table.records.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.road_name, "main street");
        assert_eq!(record.hourly_counts, HourlyProfile([12.5; HOURS]));
    }

    #[test]
    fn test_parse_without_normalization_only_trims() {
        let text = format!("{}\n{}\n", header(), row(1, "  Main St. ", &flat(1.0)));
        let options = ParseOptions {
            normalize_names: false,
            ..Default::default()
        };
        let table = parse_counts(&text, &options).unwrap();
        assert_eq!(table.records[0].road_name, "Main St.");
    }

    #[test]
    fn test_thirty_columns_skipped_thirty_one_accepted() {
        let mut short = flat(5.0);
        short.pop();
        let text = format!(
            "{}\n{}\n{}\n",
            header(),
            row(1, "Short Rd", &short),
            row(2, "Full Rd", &flat(5.0))
        );
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].road_name, "full road");
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_malformed_and_quoted_cells() {
        let mut cells: Vec<String> = flat(1.0).iter().map(|c| c.to_string()).collect();
        cells[0] = "\"42\"".to_string();
        cells[1] = "n/a".to_string();
        cells[2] = String::new();
        cells[3] = " 7.5 ".to_string();
        cells[4] = "NaN".to_string();
        let line = format!("9,,Elm Ave,,,,,{}", cells.join(","));
        let text = format!("{}\n{}", header(), line);

        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        let counts = table.records[0].hourly_counts;
        assert_eq!(counts.at(0), Some(42.0));
        assert_eq!(counts.at(1), Some(0.0));
        assert_eq!(counts.at(2), Some(0.0));
        assert_eq!(counts.at(3), Some(7.5));
        assert_eq!(counts.at(4), Some(0.0));
        assert_eq!(counts.at(5), Some(1.0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = format!("{}\r\n{}\r\n", header(), row(1, "Oak Ln", &flat(3.0)));
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].hourly_counts.at(23), Some(3.0));
    }

    #[test]
    fn test_lone_carriage_return_stays_in_row() {
        let line = row(1, "Main\rSt", &flat(4.0));
        let text = format!("{}\n{}\n", header(), line);
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();

        assert_eq!(table.skipped_rows, 0);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].road_name, "main street");
        assert_eq!(table.records[0].hourly_counts, HourlyProfile([4.0; HOURS]));
    }

    #[test]
    fn test_comma_only_header_is_still_the_header() {
        let text = format!(
            "{}\n{}\n{}\n",
            ",".repeat(MIN_COLUMNS - 1),
            row(1, "Main St", &flat(1.0)),
            row(2, "Elm Ave", &flat(2.0))
        );
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();

        let names: Vec<_> = table.records.iter().map(|r| r.road_name.as_str()).collect();
        assert_eq!(names, ["main street", "elm avenue"]);
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_comma_only_rows_are_rows() {
        let text = format!(
            "{}\n{}\n{}\n",
            header(),
            ",".repeat(MIN_COLUMNS - 1),
            ",".repeat(5)
        );
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].road_name, "");
        assert_eq!(table.records[0].hourly_counts, HourlyProfile::default());
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_whitespace_lines_skipped() {
        let text = format!(
            "  \r\n{}\n \t \n{}\n\r\n",
            header(),
            row(1, "Oak Ln", &flat(1.0))
        );
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_quoted_road_name() {
        let text = format!("{}\n{}\n", header(), row(1, "\"Main St\"", &flat(1.0)));
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert_eq!(table.records[0].road_name, "main street");

        let options = ParseOptions {
            normalize_names: false,
            ..Default::default()
        };
        let table = parse_counts(&text, &options).unwrap();
        assert_eq!(table.records[0].road_name, "Main St");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let mut counts = flat(2.0);
        counts.push(999.0);
        let text = format!("{}\n{}\n", header(), row(1, "Pine Ct", &counts));
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert_eq!(table.records[0].hourly_counts, HourlyProfile([2.0; HOURS]));
    }

    #[test]
    fn test_strict_header_rejects_narrow_header() {
        let text = format!("id,road\n{}\n", row(1, "Main St", &flat(1.0)));
        let options = ParseOptions {
            strict_header: true,
            ..Default::default()
        };
        let err = parse_counts(&text, &options).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NarrowHeader {
                found: 2,
                required: 31
            }
        ));
    }

    #[test]
    fn test_lenient_header_accepts_narrow_header() {
        let text = format!("id,road\n{}\n", row(1, "Main St", &flat(1.0)));
        let table = parse_counts(&text, &ParseOptions::default()).unwrap();
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("\"12\""), 12.0);
        assert_eq!(parse_count("1e2"), 100.0);
        assert_eq!(parse_count("abc"), 0.0);
        assert_eq!(parse_count("inf"), 0.0);
    }
}
