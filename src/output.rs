//! Output formatting and persistence for aggregation results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{HOURS, ProfileTable};
use crate::stats::RoadHourStats;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    info!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes per-road rows for one hour to a CSV file, replacing it.
pub fn write_rows(path: impl AsRef<Path>, rows: &[RoadHourStats]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing hourly rows");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_writer(File::create(path)?);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the averaged table as `road,samples,hour_00..hour_23,daily_mean`.
pub fn write_profiles(path: impl AsRef<Path>, profiles: &ProfileTable) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), roads = profiles.len(), "Writing profiles");

    let mut writer = WriterBuilder::new().from_writer(File::create(path)?);

    let mut header = vec!["road".to_string(), "samples".to_string()];
    header.extend((0..HOURS).map(|h| format!("hour_{h:02}")));
    header.push("daily_mean".to_string());
    writer.write_record(&header)?;

    for profile in profiles.values() {
        let mut record = vec![profile.key.clone(), profile.samples.to_string()];
        record.extend(profile.hourly_average.iter().map(|v| v.to_string()));
        record.push(profile.daily_mean().to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
