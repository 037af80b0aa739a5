//! The k-round relaxation loop: route scans and footpath relaxation.

use std::collections::HashMap;

use chrono::Duration;
use fixedbitset::FixedBitSet;
use tracing::trace;

use super::labels::{LabelStore, Predecessor, beats};
use crate::domain::{RouteId, StopId, TransitTime, TripId};
use crate::network::TransitNetwork;

/// The seeded boarding of one departure pass: where the pass starts, and
/// the route scan round 1 is allowed to consider. Round 1 has a single
/// deterministic boarding, so its queue is built from this directly
/// instead of from the frontier.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PassSeed {
    pub stop: StopId,
    pub first_route: RouteId,
    pub first_stop_index: usize,
}

/// The trip currently held while scanning along a route.
struct Held<'a> {
    trip: TripId,
    times: &'a [TransitTime],
    boarding_stop: StopId,
    boarding_time: TransitTime,
}

/// Run up to `max_transfers` rounds for the current pass, mutating the
/// store in place. Results are read back from the label and predecessor
/// tables afterwards.
pub(crate) fn run_rounds<N: TransitNetwork>(
    network: &N,
    store: &mut LabelStore,
    destinations: &[StopId],
    seed: &PassSeed,
    change_time: Duration,
) {
    let num_stops = store.num_stops();

    // Stops whose label improved in the previous round; round 0 improved
    // exactly the seeded boarding stop.
    let mut frontier = FixedBitSet::with_capacity(num_stops);
    frontier.insert(seed.stop.index());

    let mut queue: HashMap<RouteId, usize> = HashMap::new();

    for k in 1..=store.max_transfers() {
        queue.clear();
        if k == 1 {
            queue.insert(seed.first_route, seed.first_stop_index);
        } else {
            for stop in frontier.ones().map(|i| StopId(i as u32)) {
                for &route in network.routes_serving(stop) {
                    let Some(idx) = network.route_stop_index(route, stop) else {
                        continue;
                    };
                    // Keep the earliest position so the scan below starts
                    // as early as possible.
                    queue
                        .entry(route)
                        .and_modify(|e| *e = (*e).min(idx))
                        .or_insert(idx);
                }
            }
        }

        let mut marked = FixedBitSet::with_capacity(num_stops);

        for (&route, &start_index) in &queue {
            trace!(round = k, route = %route, start = start_index, "scanning route");
            scan_route(
                network,
                store,
                destinations,
                k,
                route,
                start_index,
                change_time,
                &mut marked,
            );
        }

        // Footpath relaxation, seeded by the stops the scan just marked.
        // Walks do not cascade within a round: a stop reached by walking
        // feeds the next round's queue, not this loop.
        let walk_sources: Vec<StopId> = marked.ones().map(|i| StopId(i as u32)).collect();
        for p in walk_sources {
            let Some(here) = store.round(k, p) else {
                continue;
            };
            for fp in network.footpaths_from(p) {
                let candidate = here + fp.duration;
                if beats(candidate, store.round(k, fp.to))
                    && beats(candidate, store.best(fp.to))
                    && beats(candidate, store.destination_bound(destinations))
                {
                    trace!(round = k, from = %p, to = %fp.to, "footpath improved arrival");
                    store.commit(
                        k,
                        fp.to,
                        candidate,
                        Predecessor::Walked {
                            from: p,
                            to: fp.to,
                            duration: fp.duration,
                            arrival: candidate,
                        },
                    );
                    marked.insert(fp.to.index());
                }
            }
        }

        if marked.count_ones(..) == 0 {
            trace!(round = k, "round marked no stops, ending pass");
            break;
        }
        frontier = marked;
    }
}

/// Scan one route from `start_index` to its end, carrying the held trip.
///
/// Two independent steps per stop: alight the held trip where that beats
/// the known bounds, and re-select the held trip wherever the previous
/// round's arrival plus change time would let an earlier trip be caught.
/// A held trip is never swapped for a worse one; a failed re-selection
/// clears it.
#[allow(clippy::too_many_arguments)]
fn scan_route<N: TransitNetwork>(
    network: &N,
    store: &mut LabelStore,
    destinations: &[StopId],
    k: usize,
    route: RouteId,
    start_index: usize,
    change_time: Duration,
    marked: &mut FixedBitSet,
) {
    let stops = network.stop_sequence(route);
    let mut held: Option<Held<'_>> = None;

    for (idx, &p_i) in stops.iter().enumerate().skip(start_index) {
        if let Some(h) = &held {
            let arrival = h.times[idx];
            if beats(arrival, store.best(p_i))
                && beats(arrival, store.destination_bound(destinations))
            {
                store.commit(
                    k,
                    p_i,
                    arrival,
                    Predecessor::Boarded {
                        trip: h.trip,
                        boarding_stop: h.boarding_stop,
                        boarding_time: h.boarding_time,
                        alight_stop: p_i,
                        arrival,
                    },
                );
                marked.insert(p_i.index());
            }
        }

        if let Some(prev) = store.round(k - 1, p_i) {
            let cutoff = prev + change_time;
            let held_time = held.as_ref().map(|h| h.times[idx]);
            if held_time.is_none_or(|t| cutoff < t) {
                held = network.board_trip(route, idx, cutoff).map(|b| Held {
                    trip: b.trip,
                    times: b.times,
                    boarding_stop: p_i,
                    boarding_time: b.times[idx],
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripId;
    use crate::network::Timetable;

    fn t(s: &str) -> TransitTime {
        TransitTime::parse(s).unwrap()
    }

    /// One route 0 -> 1 -> 2 with a single trip.
    fn single_route() -> (Timetable, RouteId, TripId) {
        let mut tt = Timetable::new(3);
        let route = tt.add_route(&[StopId(0), StopId(1), StopId(2)]).unwrap();
        let trip = tt
            .add_trip(route, &[t("08:00:00"), t("08:10:00"), t("08:20:00")])
            .unwrap();
        (tt, route, trip)
    }

    fn seed_at(stop: StopId, route: RouteId, idx: usize) -> PassSeed {
        PassSeed {
            stop,
            first_route: route,
            first_stop_index: idx,
        }
    }

    #[test]
    fn round_one_labels_every_downstream_stop() {
        let (tt, route, trip) = single_route();
        let mut store = LabelStore::new(3, 1);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(2)],
            &seed_at(StopId(0), route, 0),
            Duration::zero(),
        );

        assert_eq!(store.round(1, StopId(1)), Some(t("08:10:00")));
        assert_eq!(store.round(1, StopId(2)), Some(t("08:20:00")));
        match store.predecessor(1, StopId(2)).unwrap() {
            Predecessor::Boarded {
                trip: used,
                boarding_stop,
                alight_stop,
                ..
            } => {
                assert_eq!(*used, trip);
                assert_eq!(*boarding_stop, StopId(0));
                assert_eq!(*alight_stop, StopId(2));
            }
            other => panic!("expected a boarding, got {other:?}"),
        }
    }

    #[test]
    fn footpath_beats_later_vehicle() {
        // Route A: 0 -> 1, arriving 1 at 08:10.
        // Route B: 1 -> 3, departing 1 at 08:30, arriving 3 at 08:40.
        // Footpath 1 -> 3 in 3 minutes: arrives 08:13, must win.
        let mut tt = Timetable::new(4);
        let a = tt.add_route(&[StopId(0), StopId(1)]).unwrap();
        tt.add_trip(a, &[t("08:00:00"), t("08:10:00")]).unwrap();
        let b = tt.add_route(&[StopId(1), StopId(3)]).unwrap();
        tt.add_trip(b, &[t("08:30:00"), t("08:40:00")]).unwrap();
        tt.add_footpath(StopId(1), StopId(3), Duration::minutes(3))
            .unwrap();

        let mut store = LabelStore::new(4, 2);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(3)],
            &seed_at(StopId(0), a, 0),
            Duration::zero(),
        );

        assert_eq!(store.round(1, StopId(3)), Some(t("08:13:00")));
        assert!(matches!(
            store.predecessor(1, StopId(3)),
            Some(Predecessor::Walked { from: StopId(1), .. })
        ));
        // Round 2 must not degrade the walk with the 08:40 vehicle arrival.
        assert_eq!(store.best(StopId(3)), Some(t("08:13:00")));
    }

    #[test]
    fn transfer_needs_a_second_round() {
        // Route A: 0 -> 1. Route B: 1 -> 2, catchable after A.
        let mut tt = Timetable::new(3);
        let a = tt.add_route(&[StopId(0), StopId(1)]).unwrap();
        tt.add_trip(a, &[t("08:00:00"), t("08:10:00")]).unwrap();
        let b = tt.add_route(&[StopId(1), StopId(2)]).unwrap();
        tt.add_trip(b, &[t("08:15:00"), t("08:25:00")]).unwrap();

        let mut store = LabelStore::new(3, 2);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(2)],
            &seed_at(StopId(0), a, 0),
            Duration::zero(),
        );

        assert_eq!(store.round(1, StopId(2)), None);
        assert_eq!(store.round(2, StopId(2)), Some(t("08:25:00")));
    }

    #[test]
    fn change_time_rejects_tight_connections() {
        // Same network as above, but the connection at stop 1 leaves only
        // five minutes and we demand ten.
        let mut tt = Timetable::new(3);
        let a = tt.add_route(&[StopId(0), StopId(1)]).unwrap();
        tt.add_trip(a, &[t("08:00:00"), t("08:10:00")]).unwrap();
        let b = tt.add_route(&[StopId(1), StopId(2)]).unwrap();
        tt.add_trip(b, &[t("08:15:00"), t("08:25:00")]).unwrap();

        let mut store = LabelStore::new(3, 2);
        store.begin_pass();
        // Seeding at 07:50 keeps the round-1 boarding of route A legal
        // under the ten-minute change time.
        store.seed(StopId(0), t("07:50:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(2)],
            &seed_at(StopId(0), a, 0),
            Duration::minutes(10),
        );

        assert_eq!(store.round(1, StopId(1)), Some(t("08:10:00")));
        assert_eq!(store.round(2, StopId(2)), None);
        assert_eq!(store.best(StopId(2)), None);
    }

    #[test]
    fn pruning_keeps_labels_needed_by_the_farther_destination() {
        // Stop 1 is a near destination, stop 2 a farther one on the same
        // trip. Arrival at 2 is worse than the bound at 1 but must still
        // be accepted, because the bound is per-destination-coverage.
        let (tt, route, _) = single_route();
        let mut store = LabelStore::new(3, 1);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(1), StopId(2)],
            &seed_at(StopId(0), route, 0),
            Duration::zero(),
        );

        assert_eq!(store.round(1, StopId(1)), Some(t("08:10:00")));
        assert_eq!(store.round(1, StopId(2)), Some(t("08:20:00")));
    }

    #[test]
    fn unproductive_round_terminates_early() {
        // Destination 2 is on no route and has no footpath: after round 1
        // marks nothing new, the loop must stop well before the round cap.
        let mut tt = Timetable::new(3);
        let a = tt.add_route(&[StopId(0), StopId(1)]).unwrap();
        tt.add_trip(a, &[t("08:00:00"), t("08:10:00")]).unwrap();

        let mut store = LabelStore::new(3, 8);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));

        run_rounds(
            &tt,
            &mut store,
            &[StopId(2)],
            &seed_at(StopId(0), a, 0),
            Duration::zero(),
        );

        // Round 1 reaches stop 1; round 2 re-scans route A from stop 1
        // and improves nothing, so rounds 3..8 never run. Observable
        // effect: no label anywhere beyond round 1.
        for k in 2..=8 {
            for s in 0..3 {
                assert_eq!(store.round(k, StopId(s)), None);
            }
        }
        assert_eq!(store.best(StopId(2)), None);
    }
}
