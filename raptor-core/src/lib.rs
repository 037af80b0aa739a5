//! Round-based one-to-many transit routing.
//!
//! Answers: "departing stop S at any time of the day, what are the
//! Pareto-optimal earliest arrivals at a set of destination stops, using
//! at most k vehicle boardings?" The search is a range variant of RAPTOR:
//! candidate departures at the source are swept in descending time order,
//! and the best arrival bounds established by later departures prune the
//! work done for earlier ones.

pub mod domain;
pub mod network;
pub mod search;
