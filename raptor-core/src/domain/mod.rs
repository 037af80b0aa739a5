//! Core domain types: stop/route/trip identifiers and transit times.

mod ids;
mod time;

pub use ids::{RouteId, ServiceUsed, StopId, TripId};
pub use time::{TimeError, TransitTime};
