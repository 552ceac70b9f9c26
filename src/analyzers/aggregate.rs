use crate::analyzers::types::{
    AggregatedRoadProfile, HOURS, HourlyProfile, ProfileTable, RawDailyRecord,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Averages daily records into one profile per road key.
///
/// Each hour of a profile is the arithmetic mean of that hour across every
/// record sharing the key, so a key seen once keeps its values unchanged.
pub fn aggregate(records: &[RawDailyRecord]) -> ProfileTable {
    let mut groups: BTreeMap<&str, ([f64; HOURS], usize)> = BTreeMap::new();

    for record in records {
        let (sums, count) = groups
            .entry(record.road_name.as_str())
            .or_insert(([0.0; HOURS], 0));
        for (sum, value) in sums.iter_mut().zip(record.hourly_counts.iter()) {
            *sum += value;
        }
        *count += 1;
    }

    let profiles: ProfileTable = groups
        .into_iter()
        .map(|(key, (sums, count))| {
            let average = sums.map(|sum| sum / count as f64);
            (
                key.to_string(),
                AggregatedRoadProfile {
                    key: key.to_string(),
                    hourly_average: HourlyProfile(average),
                    samples: count,
                },
            )
        })
        .collect();

    debug!(
        records = records.len(),
        roads = profiles.len(),
        "Averaged daily records"
    );

    profiles
}
