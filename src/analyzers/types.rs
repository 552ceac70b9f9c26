//! Data types shared by the parsing, averaging and matching stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of hourly columns in a traffic-count row.
pub const HOURS: usize = 24;

/// Twenty-four hourly values, indexed 0..=23 by clock hour (0 = 12AM–1AM).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyProfile(pub [f64; HOURS]);

impl Default for HourlyProfile {
    fn default() -> Self {
        Self([0.0; HOURS])
    }
}

impl HourlyProfile {
    /// Value for a 0-based hour. Returns `None` past hour 23.
    pub fn at(&self, hour: usize) -> Option<f64> {
        self.0.get(hour).copied()
    }

    /// Value for a 1-based clock slot (1..=24), the convention used by
    /// renderers that key their hourly tables from 1.
    pub fn clock_slot(&self, slot: usize) -> Option<f64> {
        slot.checked_sub(1).and_then(|h| self.at(h))
    }

    /// Mean across all 24 hours.
    pub fn daily_mean(&self) -> f64 {
        super::utility::mean(&self.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

/// One row of the source table: a road and its counts for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDailyRecord {
    pub road_name: String,
    pub hourly_counts: HourlyProfile,
}

/// Per-hour averages for every record sharing a road key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRoadProfile {
    pub key: String,
    pub hourly_average: HourlyProfile,
    /// Number of daily records folded into the averages. Always at least 1.
    pub samples: usize,
}

impl AggregatedRoadProfile {
    /// Average traffic over the whole day.
    pub fn daily_mean(&self) -> f64 {
        self.hourly_average.daily_mean()
    }
}

/// Averaged profiles keyed by road key, iterated in lexical key order.
pub type ProfileTable = BTreeMap<String, AggregatedRoadProfile>;

/// A road discovered elsewhere (e.g. from map geometry) that should receive
/// traffic data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadTarget {
    pub display_name: String,
}

impl RoadTarget {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// How a target found (or failed to find) its profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Unmatched,
}

/// Outcome for a single target. `'t` borrows the targets, `'p` the profile
/// table.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'t, 'p> {
    pub target: &'t RoadTarget,
    pub profile: Option<&'p AggregatedRoadProfile>,
    pub kind: MatchKind,
}

/// Results for every target, in input order, plus counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport<'t, 'p> {
    pub results: Vec<MatchResult<'t, 'p>>,
    pub matched: usize,
    pub unmatched: usize,
}

impl MatchReport<'_, '_> {
    /// Share of targets that matched, as a percentage.
    pub fn matched_pct(&self) -> f64 {
        super::utility::pct(self.matched, self.matched + self.unmatched)
    }
}
