//! In-memory network index.

use std::collections::HashMap;

use chrono::Duration;

use super::{BoardableTrip, Departure, Footpath, TransitNetwork};
use crate::domain::{RouteId, StopId, TransitTime, TripId};

/// Error returned when populating a [`Timetable`] with inconsistent data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Route id not created by this timetable
    #[error("unknown route: {0}")]
    UnknownRoute(RouteId),

    /// Stop ordinal outside the declared stop range
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// A route needs at least two stops to carry anyone anywhere
    #[error("route pattern must have at least two stops")]
    PatternTooShort,

    /// Trip time sequence doesn't align with the route's stop pattern
    #[error("trip has {got} times but route has {expected} stops")]
    TripLengthMismatch { expected: usize, got: usize },
}

/// One route's pattern and timetable.
#[derive(Debug, Clone, Default)]
struct RouteData {
    stops: Vec<StopId>,
    /// Per-stop times for each trip, ascending and non-overtaking.
    trips: Vec<Vec<TransitTime>>,
}

/// An in-memory [`TransitNetwork`].
///
/// Populated through the checked mutators; the derived indices (routes by
/// stop, stop position by route) are maintained eagerly so lookups on the
/// search's hot path are array reads.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use raptor_core::domain::{StopId, TransitTime};
/// use raptor_core::network::{Timetable, TransitNetwork};
///
/// let mut tt = Timetable::new(3);
/// let route = tt.add_route(&[StopId(0), StopId(1), StopId(2)]).unwrap();
/// tt.add_trip(route, &[
///     TransitTime::parse("08:00:00").unwrap(),
///     TransitTime::parse("08:10:00").unwrap(),
///     TransitTime::parse("08:20:00").unwrap(),
/// ]).unwrap();
/// tt.add_footpath(StopId(1), StopId(2), Duration::minutes(3)).unwrap();
///
/// assert_eq!(tt.routes_serving(StopId(1)), &[route]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    routes: Vec<RouteData>,
    routes_by_stop: Vec<Vec<RouteId>>,
    position: HashMap<(RouteId, StopId), usize>,
    footpaths: Vec<Vec<Footpath>>,
}

impl Timetable {
    /// Create a timetable over stops `0..num_stops`.
    pub fn new(num_stops: usize) -> Self {
        Self {
            routes: Vec::new(),
            routes_by_stop: vec![Vec::new(); num_stops],
            position: HashMap::new(),
            footpaths: vec![Vec::new(); num_stops],
        }
    }

    fn check_stop(&self, stop: StopId) -> Result<(), NetworkError> {
        if stop.index() >= self.routes_by_stop.len() {
            return Err(NetworkError::UnknownStop(stop));
        }
        Ok(())
    }

    /// Register a route with the given ordered stop pattern.
    pub fn add_route(&mut self, stops: &[StopId]) -> Result<RouteId, NetworkError> {
        if stops.len() < 2 {
            return Err(NetworkError::PatternTooShort);
        }
        for &stop in stops {
            self.check_stop(stop)?;
        }

        let route = RouteId(self.routes.len() as u32);
        for (idx, &stop) in stops.iter().enumerate() {
            // Keep the earliest position where a pattern revisits a stop.
            self.position.entry((route, stop)).or_insert(idx);
            let serving = &mut self.routes_by_stop[stop.index()];
            if !serving.contains(&route) {
                serving.push(route);
            }
        }
        self.routes.push(RouteData {
            stops: stops.to_vec(),
            trips: Vec::new(),
        });
        Ok(route)
    }

    /// Append a trip to a route's timetable.
    ///
    /// Trips must be added in ascending order (the timetable does not
    /// re-sort); `times` aligns positionally with the route's stop
    /// pattern.
    pub fn add_trip(
        &mut self,
        route: RouteId,
        times: &[TransitTime],
    ) -> Result<TripId, NetworkError> {
        let data = self
            .routes
            .get_mut(route.index())
            .ok_or(NetworkError::UnknownRoute(route))?;
        if times.len() != data.stops.len() {
            return Err(NetworkError::TripLengthMismatch {
                expected: data.stops.len(),
                got: times.len(),
            });
        }
        let trip = TripId::new(route, data.trips.len() as u32);
        data.trips.push(times.to_vec());
        Ok(trip)
    }

    /// Add a directed footpath.
    pub fn add_footpath(
        &mut self,
        from: StopId,
        to: StopId,
        duration: Duration,
    ) -> Result<(), NetworkError> {
        self.check_stop(from)?;
        self.check_stop(to)?;
        self.footpaths[from.index()].push(Footpath { to, duration });
        Ok(())
    }
}

impl TransitNetwork for Timetable {
    fn num_stops(&self) -> usize {
        self.routes_by_stop.len()
    }

    fn routes_serving(&self, stop: StopId) -> &[RouteId] {
        self.routes_by_stop
            .get(stop.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn stop_sequence(&self, route: RouteId) -> &[StopId] {
        self.routes
            .get(route.index())
            .map(|r| r.stops.as_slice())
            .unwrap_or(&[])
    }

    fn route_stop_index(&self, route: RouteId, stop: StopId) -> Option<usize> {
        self.position.get(&(route, stop)).copied()
    }

    fn footpaths_from(&self, stop: StopId) -> &[Footpath] {
        self.footpaths
            .get(stop.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn board_trip(
        &self,
        route: RouteId,
        stop_index: usize,
        not_before: TransitTime,
    ) -> Option<BoardableTrip<'_>> {
        let data = self.routes.get(route.index())?;
        data.trips
            .iter()
            .enumerate()
            .find(|(_, times)| times.get(stop_index).is_some_and(|&t| t >= not_before))
            .map(|(ordinal, times)| BoardableTrip {
                trip: TripId::new(route, ordinal as u32),
                times,
            })
    }

    fn departures_from(&self, stop: StopId) -> Vec<Departure> {
        let mut departures = Vec::new();
        for &route in self.routes_serving(stop) {
            let data = &self.routes[route.index()];
            let Some(&idx) = self.position.get(&(route, stop)) else {
                continue;
            };
            // Boarding at the final stop of a pattern goes nowhere.
            if idx + 1 >= data.stops.len() {
                continue;
            }
            for (ordinal, times) in data.trips.iter().enumerate() {
                departures.push(Departure {
                    trip: TripId::new(route, ordinal as u32),
                    time: times[idx],
                    stop_index: idx,
                });
            }
        }
        departures
    }
}
