//! Search configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Granularity of the services reported for each optimal journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputGranularity {
    /// Report the individual trips boarded.
    Trips,
    /// Report the routes those trips run on.
    Routes,
}

/// Configuration parameters for a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of vehicle boardings per journey. Zero is legal and
    /// yields no journeys (nothing is reachable without boarding).
    pub max_transfers: usize,

    /// Minimum dwell time between alighting and the next boarding
    /// (seconds). Applied to every boarding, including the first.
    pub change_time_secs: i64,

    /// Whether departures reachable by first walking a footpath out of
    /// the source count as departures from the source.
    pub walk_from_source: bool,

    /// Trip-level or route-level output.
    pub granularity: OutputGranularity,
}

impl SearchConfig {
    /// Returns the change time as a Duration.
    pub fn change_time(&self) -> Duration {
        Duration::seconds(self.change_time_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers: 4,
            change_time_secs: 60,
            walk_from_source: true,
            granularity: OutputGranularity::Trips,
        }
    }
}
