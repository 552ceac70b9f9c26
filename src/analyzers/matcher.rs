//! Matches externally discovered roads against averaged profiles.

use crate::analyzers::types::{
    AggregatedRoadProfile, MatchKind, MatchReport, MatchResult, ProfileTable, RoadTarget,
};
use crate::normalize::normalize;
use tracing::{debug, info};

/// Finds a profile for every target, in input order.
///
/// An exact key lookup is tried first. Failing that, the first key in lexical
/// order that contains the target name, or is contained by it, wins. Empty
/// names and empty keys never take part in substring matching.
pub fn match_targets<'t, 'p>(
    targets: &'t [RoadTarget],
    profiles: &'p ProfileTable,
    normalize_names: bool,
) -> MatchReport<'t, 'p> {
    let mut report = MatchReport::default();

    for target in targets {
        let name = if normalize_names {
            normalize(&target.display_name)
        } else {
            target.display_name.clone()
        };

        let (profile, kind) = match find_profile(&name, profiles) {
            Some((profile, kind)) => {
                report.matched += 1;
                (Some(profile), kind)
            }
            None => {
                debug!(road = %target.display_name, "No traffic data for road");
                report.unmatched += 1;
                (None, MatchKind::Unmatched)
            }
        };

        report.results.push(MatchResult {
            target,
            profile,
            kind,
        });
    }

    info!(
        matched = report.matched,
        unmatched = report.unmatched,
        "Traffic data matched to roads"
    );

    report
}

fn find_profile<'a>(
    name: &str,
    profiles: &'a ProfileTable,
) -> Option<(&'a AggregatedRoadProfile, MatchKind)> {
    if let Some(profile) = profiles.get(name) {
        return Some((profile, MatchKind::Exact));
    }

    if name.is_empty() {
        return None;
    }

    profiles
        .iter()
        .find(|(key, _)| !key.is_empty() && (key.contains(name) || name.contains(key.as_str())))
        .map(|(_, profile)| (profile, MatchKind::Fuzzy))
}
