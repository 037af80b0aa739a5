//! The network index: read-only lookup structures over stops, routes,
//! trips and footpaths.
//!
//! The search core consumes the network through the [`TransitNetwork`]
//! trait, so it can run against any index representation (and be tested
//! against hand-built fixtures). [`Timetable`] is the bundled in-memory
//! implementation; building one from a raw feed is the caller's concern.

mod timetable;

pub use timetable::{NetworkError, Timetable};

use chrono::Duration;

use crate::domain::{RouteId, StopId, TransitTime, TripId};

/// A directed out-of-vehicle transfer: walk from one stop to another in a
/// fixed duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footpath {
    pub to: StopId,
    pub duration: Duration,
}

/// A boarding opportunity at a stop: a trip, its time there, and the
/// stop's position in the trip's route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Departure {
    pub trip: TripId,
    pub time: TransitTime,
    pub stop_index: usize,
}

/// A trip selected for boarding, with its full per-stop time sequence
/// (positionally aligned with the route's stop pattern).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardableTrip<'a> {
    pub trip: TripId,
    pub times: &'a [TransitTime],
}

/// Read-only view of a scheduled transit network.
///
/// Lookups never fail: an unknown stop serves no routes and has no
/// footpaths, an unknown route has an empty stop sequence. Trips on a
/// route are assumed stored in ascending, non-overtaking order (earlier
/// trips are no later at every position); the index builder is
/// responsible for that, not the search.
pub trait TransitNetwork {
    /// Number of stops; `StopId` ordinals are `0..num_stops()`.
    fn num_stops(&self) -> usize;

    /// Routes serving a stop. Empty for an unknown stop.
    fn routes_serving(&self, stop: StopId) -> &[RouteId];

    /// The ordered stop pattern of a route. Empty for an unknown route.
    fn stop_sequence(&self, route: RouteId) -> &[StopId];

    /// Position of `stop` on `route`, or `None` if the route does not
    /// serve it. Where a route visits a stop more than once, this is the
    /// earliest position.
    fn route_stop_index(&self, route: RouteId, stop: StopId) -> Option<usize>;

    /// Directed footpaths leaving a stop. Empty for an unknown stop.
    fn footpaths_from(&self, stop: StopId) -> &[Footpath];

    /// The trip selector: the first trip on `route` (in timetable order)
    /// whose time at `stop_index` is at or after `not_before`, or `None`
    /// if no trip that day qualifies. Under non-overtaking timetables
    /// this boarding is arrival-optimal at every downstream stop.
    fn board_trip(
        &self,
        route: RouteId,
        stop_index: usize,
        not_before: TransitTime,
    ) -> Option<BoardableTrip<'_>>;

    /// Every boarding opportunity at `stop`, across all serving routes
    /// and trips. Departures from a route's final stop are omitted
    /// (nothing can be reached by boarding there). Empty for an unknown
    /// stop.
    fn departures_from(&self, stop: StopId) -> Vec<Departure>;
}
