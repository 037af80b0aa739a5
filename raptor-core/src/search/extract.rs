//! Journey extraction from predecessor chains.
//!
//! After a departure pass, the predecessor table encodes every optimal
//! journey found this pass, one per (destination, round) pair that
//! improved. Extraction walks those chains back to the pass's seed and
//! reports the services boarded along the way.

use std::collections::HashSet;

use super::config::OutputGranularity;
use super::labels::{LabelStore, Predecessor};
use crate::domain::{ServiceUsed, StopId};

/// Collect the services realising every optimal journey of the current
/// pass, at the requested granularity.
///
/// For each destination and each round with a predecessor record, the
/// chain is walked back to the seed; each boarded leg contributes its
/// trip (or the trip's route), in boarding order. Services are
/// deduplicated within the pass, first appearance kept. A pure read of
/// the store: calling this twice yields identical output.
pub fn extract_services(
    store: &LabelStore,
    destinations: &[StopId],
    granularity: OutputGranularity,
) -> Vec<ServiceUsed> {
    let mut out = Vec::new();

    for &dest in destinations {
        for k in 1..=store.max_transfers() {
            if store.predecessor(k, dest).is_none() {
                continue;
            }

            let mut legs = Vec::new();
            let mut stop = dest;
            let mut round = k;
            // Boarded legs step back a round; walks stay within one. The
            // chain ends at the seed (round 0 has no predecessors) or at
            // a boarding fed by a previous pass's label, which has no
            // records in this pass.
            while let Some(pred) = store.predecessor(round, stop) {
                match *pred {
                    Predecessor::Boarded {
                        trip,
                        boarding_stop,
                        ..
                    } => {
                        legs.push(match granularity {
                            OutputGranularity::Trips => ServiceUsed::Trip(trip),
                            OutputGranularity::Routes => ServiceUsed::Route(trip.route),
                        });
                        stop = boarding_stop;
                        if round == 0 {
                            break;
                        }
                        round -= 1;
                    }
                    Predecessor::Walked { from, .. } => {
                        stop = from;
                    }
                }
            }

            // Collected alight-first; report in boarding order.
            legs.reverse();
            out.extend(legs);
        }
    }

    let mut seen = HashSet::new();
    out.retain(|service| seen.insert(*service));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, TransitTime, TripId};
    use chrono::Duration;

    fn t(s: &str) -> TransitTime {
        TransitTime::parse(s).unwrap()
    }

    fn board(
        route: u32,
        ordinal: u32,
        from: StopId,
        to: StopId,
        dep: &str,
        arr: &str,
    ) -> Predecessor {
        Predecessor::Boarded {
            trip: TripId::new(RouteId(route), ordinal),
            boarding_stop: from,
            boarding_time: t(dep),
            alight_stop: to,
            arrival: t(arr),
        }
    }

    fn walk(from: StopId, to: StopId, mins: i64, arr: &str) -> Predecessor {
        Predecessor::Walked {
            from,
            to,
            duration: Duration::minutes(mins),
            arrival: t(arr),
        }
    }

    /// Seed at 0; round 1 boards route 0 to stop 1; walk to stop 2;
    /// round 2 boards route 1 to stop 3.
    fn two_leg_store() -> LabelStore {
        let mut store = LabelStore::new(4, 2);
        store.begin_pass();
        store.seed(StopId(0), t("08:00:00"));
        store.commit(
            1,
            StopId(1),
            t("08:10:00"),
            board(0, 0, StopId(0), StopId(1), "08:00:00", "08:10:00"),
        );
        store.commit(1, StopId(2), t("08:13:00"), walk(StopId(1), StopId(2), 3, "08:13:00"));
        store.commit(
            2,
            StopId(3),
            t("08:30:00"),
            board(1, 0, StopId(2), StopId(3), "08:20:00", "08:30:00"),
        );
        store
    }

    #[test]
    fn reports_boarded_trips_in_boarding_order() {
        let store = two_leg_store();
        let services = extract_services(&store, &[StopId(3)], OutputGranularity::Trips);
        assert_eq!(
            services,
            vec![
                ServiceUsed::Trip(TripId::new(RouteId(0), 0)),
                ServiceUsed::Trip(TripId::new(RouteId(1), 0)),
            ]
        );
    }

    #[test]
    fn route_granularity_maps_trips_to_routes() {
        let store = two_leg_store();
        let services = extract_services(&store, &[StopId(3)], OutputGranularity::Routes);
        assert_eq!(
            services,
            vec![ServiceUsed::Route(RouteId(0)), ServiceUsed::Route(RouteId(1))]
        );
    }

    #[test]
    fn shared_legs_are_reported_once() {
        let store = two_leg_store();
        // Stops 1 and 3 are both destinations; the round-1 leg realises
        // both journeys but appears once.
        let services = extract_services(&store, &[StopId(1), StopId(3)], OutputGranularity::Trips);
        assert_eq!(
            services,
            vec![
                ServiceUsed::Trip(TripId::new(RouteId(0), 0)),
                ServiceUsed::Trip(TripId::new(RouteId(1), 0)),
            ]
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let store = two_leg_store();
        let first = extract_services(&store, &[StopId(1), StopId(3)], OutputGranularity::Trips);
        let second = extract_services(&store, &[StopId(1), StopId(3)], OutputGranularity::Trips);
        assert_eq!(first, second);
    }

    #[test]
    fn unreached_destination_contributes_nothing() {
        let store = two_leg_store();
        let services = extract_services(&store, &[StopId(0)], OutputGranularity::Trips);
        assert!(services.is_empty());
    }
}
