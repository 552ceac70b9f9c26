//! Road-name normalization used as the grouping and matching key.

/// Street-suffix abbreviations, expanded in this order.
const SUFFIXES: &[(&str, &str)] = &[
    (" ave", " avenue"),
    (" blvd", " boulevard"),
    (" st", " street"),
    (" rd", " road"),
    (" dr", " drive"),
    (" pl", " place"),
    (" ln", " lane"),
    (" ct", " court"),
    (" sq", " square"),
    (" ter", " terrace"),
    (" pkwy", " parkway"),
];

/// Normalizes a road name into a matching key.
///
/// Lowercases, drops `.` and `,`, collapses whitespace, trims, then expands a
/// trailing street-suffix abbreviation (`"Main St."` becomes `"main street"`).
/// Only the end of the name is rewritten: `"Main St North"` keeps its `st`.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(['.', ','], "");
    let mut name = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    for (abbr, full) in SUFFIXES {
        if let Some(stem) = name.strip_suffix(abbr) {
            name = format!("{stem}{full}");
        }
    }

    name
}
