//! Identifier newtypes for stops, routes and trips.
//!
//! Stops and routes are dense ordinals assigned by the network index; all
//! per-stop search state is stored in flat arrays indexed by `StopId`, so
//! the hot loops never hash.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stop, identified by its dense ordinal in the network index.
///
/// Stops carry no intrinsic attributes; all structure (which routes serve
/// the stop, which footpaths leave it) lives in the index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StopId(pub u32);

impl StopId {
    /// Ordinal as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route: an ordered stop pattern shared by a set of trips.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteId(pub u32);

impl RouteId {
    /// Ordinal as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trip: one scheduled run over a route's stop pattern.
///
/// Trips are identified by their route plus their position in the route's
/// timetable, where trips are stored in ascending, non-overtaking order.
/// Displays as `"{route}_{ordinal}"`, so the route is recoverable from a
/// printed trip id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripId {
    pub route: RouteId,
    pub ordinal: u32,
}

impl TripId {
    pub fn new(route: RouteId, ordinal: u32) -> Self {
        Self { route, ordinal }
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({}_{})", self.route, self.ordinal)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.route, self.ordinal)
    }
}

/// A service referenced by an extracted journey, at the granularity the
/// caller asked for: individual trips, or the routes they run on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceUsed {
    Trip(TripId),
    Route(RouteId),
}

impl fmt::Display for ServiceUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceUsed::Trip(t) => write!(f, "{t}"),
            ServiceUsed::Route(r) => write!(f, "{r}"),
        }
    }
}
