pub mod analyzers;
pub mod color;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod roads;
pub mod stats;

pub use analyzers::types::{
    AggregatedRoadProfile, HourlyProfile, MatchKind, MatchReport, MatchResult, RawDailyRecord,
    RoadTarget,
};
pub use error::{AggregatorError, ParseError};
pub use pipeline::{Aggregation, TrafficCountAggregator};
