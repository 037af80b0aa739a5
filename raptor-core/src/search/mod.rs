//! The round-based search core.
//!
//! This module implements the range variant of RAPTOR that answers:
//! "across every possible departure from a source stop, what are the
//! Pareto-optimal earliest arrivals at a set of destinations, using at
//! most k vehicle boardings?"
//!
//! One departure pass is a bounded sequence of rounds, each round allowing
//! one more boarding; the sweep over departures runs latest-first so the
//! arrival bounds established by later departures prune every earlier one.

mod config;
mod extract;
mod labels;
mod rounds;
mod sweep;

pub use config::{OutputGranularity, SearchConfig};
pub use extract::extract_services;
pub use labels::{LabelStore, Predecessor};
pub use sweep::{QueryError, QueryRequest, QueryResult, RangePlanner};
