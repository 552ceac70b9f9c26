//! End-to-end run: read a table, average it, match it against roads.

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::matcher::match_targets;
use crate::analyzers::types::{MatchReport, ProfileTable, RoadTarget};
use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use crate::parser::{ParseOptions, parse_counts};
use std::io;
use std::path::Path;
use tracing::info;

/// Averaged profiles from one table, ready to be matched against roads.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub profiles: ProfileTable,
    /// Daily records that contributed to the profiles.
    pub records: usize,
    /// Rows dropped for having too few columns.
    pub skipped_rows: usize,
    normalize_names: bool,
}

impl Aggregation {
    /// Matches `targets` against the profiles, using the same name
    /// normalization the table was keyed with.
    pub fn match_against<'t>(&self, targets: &'t [RoadTarget]) -> MatchReport<'t, '_> {
        match_targets(targets, &self.profiles, self.normalize_names)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Stateless orchestrator; every call works on fresh data.
#[derive(Debug, Clone, Default)]
pub struct TrafficCountAggregator {
    config: AggregatorConfig,
}

impl TrafficCountAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Reads a table from disk.
    ///
    /// # Errors
    ///
    /// [`AggregatorError::NotFound`] when the file does not exist, so callers
    /// can choose to continue with no data.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<String, AggregatorError> {
        let path = path.as_ref();
        std::fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AggregatorError::NotFound(path.to_path_buf()),
            _ => AggregatorError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    /// Parses and averages table text.
    pub fn aggregate_text(&self, text: &str) -> Result<Aggregation, AggregatorError> {
        let options = ParseOptions {
            normalize_names: self.config.normalize_names,
            strict_header: self.config.strict_header,
        };
        let table = parse_counts(text, &options)?;
        let profiles = aggregate(&table.records);

        info!(
            roads = profiles.len(),
            records = table.records.len(),
            skipped = table.skipped_rows,
            "Parsed roads from traffic counts"
        );

        Ok(Aggregation {
            profiles,
            records: table.records.len(),
            skipped_rows: table.skipped_rows,
            normalize_names: self.config.normalize_names,
        })
    }

    /// Loads, parses and averages the configured table.
    pub fn aggregate_file(&self) -> Result<Aggregation, AggregatorError> {
        let text = self.load_csv(&self.config.csv_path)?;
        self.aggregate_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::MatchKind;

    const HEADER: &str = "id,seg,road,from,to,dir,date,h0,h1,h2,h3,h4,h5,h6,h7,h8,h9,h10,h11,h12,h13,h14,h15,h16,h17,h18,h19,h20,h21,h22,h23";

    fn line(id: u32, road: &str, first: f64, second: f64) -> String {
        let mut cols = vec![id.to_string(), String::new(), road.to_string()];
        cols.extend(std::iter::repeat_n(String::new(), 4));
        cols.push(first.to_string());
        cols.push(second.to_string());
        cols.extend(std::iter::repeat_n("0".to_string(), 22));
        cols.join(",")
    }

    #[test]
    fn test_main_street_example() {
        let text = format!(
            "{HEADER}\n{}\n{}\n",
            line(1, "Main St", 10.0, 20.0),
            line(2, "Main Street", 30.0, 40.0)
        );
        let aggregation = TrafficCountAggregator::default()
            .aggregate_text(&text)
            .unwrap();

        assert_eq!(aggregation.profiles.len(), 1);
        let profile = &aggregation.profiles["main street"];
        assert_eq!(profile.hourly_average.at(0), Some(20.0));
        assert_eq!(profile.hourly_average.at(1), Some(30.0));
        assert_eq!(aggregation.records, 2);

        let targets = vec![RoadTarget::new("Main St.")];
        let report = aggregation.match_against(&targets);
        assert_eq!(report.matched, 1);
        assert_eq!(report.results[0].kind, MatchKind::Exact);
    }

    #[test]
    fn test_without_normalization_keeps_spellings_apart() {
        let config = AggregatorConfig {
            normalize_names: false,
            ..Default::default()
        };
        let text = format!(
            "{HEADER}\n{}\n{}\n",
            line(1, "Main St", 10.0, 20.0),
            line(2, "Main Street", 30.0, 40.0)
        );
        let aggregation = TrafficCountAggregator::new(config)
            .aggregate_text(&text)
            .unwrap();
        assert_eq!(aggregation.profiles.len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let aggregator = TrafficCountAggregator::new(AggregatorConfig {
            csv_path: std::env::temp_dir().join("traffic_count_aggregator_missing.csv"),
            ..Default::default()
        });
        let err = aggregator.aggregate_file().unwrap_err();
        assert!(matches!(err, AggregatorError::NotFound(_)));
    }

    #[test]
    fn test_header_only_is_empty_not_error() {
        let aggregation = TrafficCountAggregator::default()
            .aggregate_text(HEADER)
            .unwrap();
        assert!(aggregation.is_empty());

        let targets = vec![RoadTarget::new("Main St")];
        let report = aggregation.match_against(&targets);
        assert_eq!(report.unmatched, 1);
    }
}
