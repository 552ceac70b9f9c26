use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::{HOURS, MatchKind, MatchReport};
use crate::color::ColorScale;
use crate::pipeline::Aggregation;

/// Traffic and colour for one road at one clock hour, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadHourStats {
    pub road: String,
    pub matched_key: Option<String>,
    pub match_kind: MatchKind,
    pub hour: usize,
    pub count: f64,
    pub daily_mean: f64,
    pub congestion: f64,
    pub color: String,
}

impl RoadHourStats {
    /// One row per target for a 0-based `hour`. Unmatched roads get a zero
    /// count and therefore the sentinel colour.
    pub fn for_hour(report: &MatchReport<'_, '_>, hour: usize, scale: &ColorScale) -> Vec<Self> {
        let hour = hour.min(HOURS - 1);

        report
            .results
            .iter()
            .map(|result| {
                let count = result
                    .profile
                    .and_then(|p| p.hourly_average.at(hour))
                    .unwrap_or(0.0);
                let daily_mean = result.profile.map(|p| p.daily_mean()).unwrap_or(0.0);
                let congestion = if count > 0.0 {
                    scale.congestion(count)
                } else {
                    0.0
                };

                RoadHourStats {
                    road: result.target.display_name.clone(),
                    matched_key: result.profile.map(|p| p.key.clone()),
                    match_kind: result.kind,
                    hour,
                    count,
                    daily_mean,
                    congestion,
                    color: scale.color_for(count).to_hex(),
                }
            })
            .collect()
    }
}

/// Run-level diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub roads_in_table: usize,
    pub records: usize,
    pub skipped_rows: usize,
    pub targets: usize,
    pub matched: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
    pub matched_pct: f64,
}

impl RunSummary {
    pub fn new(aggregation: &Aggregation, report: &MatchReport<'_, '_>) -> Self {
        let count_kind = |kind: MatchKind| report.results.iter().filter(|r| r.kind == kind).count();

        RunSummary {
            generated_at: Utc::now(),
            roads_in_table: aggregation.profiles.len(),
            records: aggregation.records,
            skipped_rows: aggregation.skipped_rows,
            targets: report.results.len(),
            matched: report.matched,
            exact: count_kind(MatchKind::Exact),
            fuzzy: count_kind(MatchKind::Fuzzy),
            unmatched: report.unmatched,
            matched_pct: report.matched_pct(),
        }
    }
}
