//! The departure sweep driver.
//!
//! One query answers "departing `source` at any time of day": every
//! boarding opportunity at the source (optionally extended through its
//! footpaths) becomes one departure pass of the round engine. Passes run
//! latest departure first, so the arrival bounds each pass establishes
//! prune all the earlier-departing passes that follow — an earlier
//! departure never needs an arrival a later one already achieved. The
//! ordering is load-bearing and must not be changed.

use tracing::debug;

use super::config::SearchConfig;
use super::extract::extract_services;
use super::labels::LabelStore;
use super::rounds::{PassSeed, run_rounds};
use crate::domain::{ServiceUsed, StopId};
use crate::network::TransitNetwork;

/// Error from a range query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// Invalid query request
    #[error("invalid query: {0}")]
    InvalidRequest(String),
}

/// A one-to-many query: one source, several destinations.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// The stop every journey departs from.
    pub source: StopId,

    /// The stops to reach. The source itself is silently dropped if
    /// listed.
    pub destinations: Vec<StopId>,
}

impl QueryRequest {
    /// Create a new query request.
    pub fn new(source: StopId, destinations: Vec<StopId>) -> Self {
        Self {
            source,
            destinations,
        }
    }

    /// Validate stop ids against the network's stop range.
    pub fn validate(&self, num_stops: usize) -> Result<(), QueryError> {
        if self.source.index() >= num_stops {
            return Err(QueryError::InvalidRequest(format!(
                "source stop {} is out of range",
                self.source
            )));
        }
        if let Some(bad) = self
            .destinations
            .iter()
            .find(|d| d.index() >= num_stops)
        {
            return Err(QueryError::InvalidRequest(format!(
                "destination stop {bad} is out of range"
            )));
        }
        Ok(())
    }
}

/// Result of a range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Concatenation, in sweep order, of the services realising each
    /// pass's optimal journeys. Not deduplicated across passes.
    pub services: Vec<ServiceUsed>,

    /// Number of departure passes run.
    pub passes: usize,
}

/// Range query planner over a transit network.
pub struct RangePlanner<'a, N: TransitNetwork> {
    network: &'a N,
    config: &'a SearchConfig,
}

impl<'a, N: TransitNetwork> RangePlanner<'a, N> {
    /// Create a new planner.
    pub fn new(network: &'a N, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// Run the descending departure sweep for one query.
    pub fn solve(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        request.validate(self.network.num_stops())?;

        let destinations: Vec<StopId> = request
            .destinations
            .iter()
            .copied()
            .filter(|&d| d != request.source)
            .collect();
        if destinations.is_empty() {
            return Err(QueryError::InvalidRequest(
                "no destination distinct from the source".to_string(),
            ));
        }

        // Every boarding opportunity at the source, plus — when walking
        // from the source is allowed — those at its footpath neighbours,
        // boarding there instead.
        let mut events: Vec<(crate::network::Departure, StopId)> = self
            .network
            .departures_from(request.source)
            .into_iter()
            .map(|d| (d, request.source))
            .collect();
        if self.config.walk_from_source {
            for fp in self.network.footpaths_from(request.source) {
                events.extend(
                    self.network
                        .departures_from(fp.to)
                        .into_iter()
                        .map(|d| (d, fp.to)),
                );
            }
        }

        // Latest departure first; the sweep's pruning argument depends on
        // this order.
        events.sort_by(|a, b| b.0.time.cmp(&a.0.time));

        let mut store = LabelStore::new(self.network.num_stops(), self.config.max_transfers);
        let mut services = Vec::new();

        for (departure, board_stop) in &events {
            store.begin_pass();
            store.seed(*board_stop, departure.time);

            let seed = PassSeed {
                stop: *board_stop,
                first_route: departure.trip.route,
                first_stop_index: departure.stop_index,
            };
            run_rounds(
                self.network,
                &mut store,
                &destinations,
                &seed,
                self.config.change_time(),
            );

            let found = extract_services(&store, &destinations, self.config.granularity);
            debug!(
                departure = %departure.time,
                board = %board_stop,
                services = found.len(),
                "departure pass complete"
            );
            services.extend(found);
        }

        debug!(
            passes = events.len(),
            services = services.len(),
            "range sweep complete"
        );

        Ok(QueryResult {
            services,
            passes: events.len(),
        })
    }
}
