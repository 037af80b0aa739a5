//! Arrival-time label tables and predecessor records.
//!
//! One `LabelStore` belongs to one query. The per-round labels and the
//! best-so-far ("star") labels live for the whole descending departure
//! sweep; the predecessor table is per departure pass. Absent labels are
//! `None` rather than a sentinel time.

use chrono::Duration;

use crate::domain::{StopId, TransitTime, TripId};

/// How a stop was reached in a given round of the current pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predecessor {
    /// Rode a trip from `boarding_stop` and alighted at `alight_stop`.
    Boarded {
        trip: TripId,
        boarding_stop: StopId,
        boarding_time: TransitTime,
        alight_stop: StopId,
        arrival: TransitTime,
    },
    /// Walked a footpath.
    Walked {
        from: StopId,
        to: StopId,
        duration: Duration,
        arrival: TransitTime,
    },
}

impl Predecessor {
    /// Arrival time this record established.
    pub fn arrival(&self) -> TransitTime {
        match *self {
            Predecessor::Boarded { arrival, .. } => arrival,
            Predecessor::Walked { arrival, .. } => arrival,
        }
    }
}

/// True when `candidate` strictly beats a possibly-absent incumbent.
pub(crate) fn beats(candidate: TransitTime, incumbent: Option<TransitTime>) -> bool {
    incumbent.is_none_or(|t| candidate < t)
}

/// Label tables for one query: per-round arrivals, best-so-far arrivals,
/// and per-pass predecessor records, all dense over stop ordinals.
#[derive(Debug, Clone)]
pub struct LabelStore {
    /// `label[k][stop]`: earliest arrival at `stop` using at most `k`
    /// boardings, for the current pass. Persists across passes.
    label: Vec<Vec<Option<TransitTime>>>,
    /// Best arrival per stop across every round and pass so far. This is
    /// the pruning state the descending sweep relies on.
    star: Vec<Option<TransitTime>>,
    /// `pi[k][stop]`: how `stop` was reached at round `k` this pass.
    pi: Vec<Vec<Option<Predecessor>>>,
}

impl LabelStore {
    /// Allocate empty tables sized `(max_transfers + 1) x num_stops`.
    pub fn new(num_stops: usize, max_transfers: usize) -> Self {
        Self {
            label: vec![vec![None; num_stops]; max_transfers + 1],
            star: vec![None; num_stops],
            pi: vec![vec![None; num_stops]; max_transfers + 1],
        }
    }

    pub fn num_stops(&self) -> usize {
        self.star.len()
    }

    pub fn max_transfers(&self) -> usize {
        self.label.len() - 1
    }

    /// Start a departure pass: predecessor records are discarded, labels
    /// and star survive (the range-sweep state reuse).
    pub fn begin_pass(&mut self) {
        for round in &mut self.pi {
            round.fill(None);
        }
    }

    /// Seed round 0 with a boarding time at a stop. Star is only ever
    /// lowered: a later pass must not weaken bounds already established.
    pub fn seed(&mut self, stop: StopId, time: TransitTime) {
        self.label[0][stop.index()] = Some(time);
        if beats(time, self.star[stop.index()]) {
            self.star[stop.index()] = Some(time);
        }
    }

    /// Arrival at `stop` in round `k` of the current pass.
    pub fn round(&self, k: usize, stop: StopId) -> Option<TransitTime> {
        self.label[k][stop.index()]
    }

    /// Best arrival at `stop` across everything processed so far.
    pub fn best(&self, stop: StopId) -> Option<TransitTime> {
        self.star[stop.index()]
    }

    /// Predecessor record for `stop` at round `k` of the current pass.
    pub fn predecessor(&self, k: usize, stop: StopId) -> Option<&Predecessor> {
        self.pi[k][stop.index()].as_ref()
    }

    /// Record an accepted improvement: round label, star and predecessor
    /// are written together. Callers check dominance first; star is still
    /// lowered-only as a safety net.
    pub fn commit(&mut self, k: usize, stop: StopId, time: TransitTime, how: Predecessor) {
        self.label[k][stop.index()] = Some(time);
        if beats(time, self.star[stop.index()]) {
            self.star[stop.index()] = Some(time);
        }
        self.pi[k][stop.index()] = Some(how);
    }

    /// The global target-pruning threshold: `None` (no pruning possible)
    /// while any destination is still unreached, otherwise the worst of
    /// the destinations' best arrivals. An update at or above this bound
    /// cannot improve any destination and is discarded.
    pub fn destination_bound(&self, destinations: &[StopId]) -> Option<TransitTime> {
        let mut bound = None;
        for &dest in destinations {
            match self.star[dest.index()] {
                None => return None,
                // The bound is the max over destinations: a candidate only
                // has to be useful to one of them to survive.
                Some(t) => bound = Some(bound.map_or(t, |b: TransitTime| b.max(t))),
            }
        }
        bound
    }
}
