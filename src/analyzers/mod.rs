//! Traffic-count averaging and road matching.
//!
//! This module folds daily rows into per-road hourly averages and pairs
//! those averages with roads discovered from map geometry.

pub mod aggregate;
pub mod matcher;
pub mod types;
pub mod utility;
