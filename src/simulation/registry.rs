//! Entity registry: single source of truth for train, signal, and
//! track-resource state
//!
//! All mutation funnels through `apply_update` so the completed-train
//! invariant is enforced in one place.

use std::collections::HashMap;

use log::warn;

use super::train::Train;
use super::types::{
    Line, Occupancy, Route, SignalAspect, SignalId, TrainId, TrainStatus,
};

/// A partial update merged into one train's record
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TrainUpdate {
    pub route: Option<Route>,
    pub status: Option<TrainStatus>,
    pub delay_minutes: Option<u32>,
}

impl TrainUpdate {
    pub fn route(route: Route) -> Self {
        Self {
            route: Some(route),
            ..Self::default()
        }
    }

    pub fn status(status: TrainStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn delay(minutes: u32) -> Self {
        Self {
            delay_minutes: Some(minutes),
            ..Self::default()
        }
    }
}

/// Outcome of `EntityRegistry::apply_update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Target train has already completed its run; nothing was changed
    RejectedCompleted,
    /// No train with the given id exists; nothing was changed
    UnknownTrain,
}

/// Holds the current state of all trains, signals, and the loop siding
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    trains: HashMap<TrainId, Train>,
    signals: Vec<(SignalId, SignalAspect)>,
    loop_track: Occupancy,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Create a registry populated from the fixed corridor template set
    pub fn new() -> Self {
        let mut registry = Self {
            trains: HashMap::new(),
            signals: Vec::new(),
            loop_track: Occupancy::Empty,
        };
        registry.initialize();
        registry
    }

    /// Reset every entity to its template default
    ///
    /// Trains come back `Running` on the main line at their entry position,
    /// signals show `Green`, and the loop siding is empty. Always succeeds.
    pub fn initialize(&mut self) {
        self.trains.clear();
        for train in train_templates() {
            self.trains.insert(train.id.clone(), train);
        }

        self.signals = ["S-01", "S-02", "S-03", "S-04"]
            .iter()
            .map(|id| (SignalId(id.to_string()), SignalAspect::Green))
            .collect();

        self.loop_track = Occupancy::Empty;
    }

    /// Merge a partial update into one train's record
    ///
    /// Updates targeting a completed train are rejected as a no-op: a
    /// completed run is terminal and resuming it would break the movement
    /// model's monotonicity guarantee. Callers surface the rejection to the
    /// observability sink; a diagnostic is logged here either way.
    pub fn apply_update(&mut self, id: &TrainId, update: TrainUpdate) -> UpdateOutcome {
        let Some(train) = self.trains.get_mut(id) else {
            warn!("update for unknown train {}", id);
            return UpdateOutcome::UnknownTrain;
        };

        if train.status == TrainStatus::Completed {
            warn!("rejected update for completed train {}", id);
            return UpdateOutcome::RejectedCompleted;
        }

        if let Some(route) = update.route {
            train.route = route;
        }
        if let Some(status) = update.status {
            train.status = status;
        }
        if let Some(delay) = update.delay_minutes {
            train.delay_minutes = delay;
        }
        UpdateOutcome::Applied
    }

    pub fn train(&self, id: &TrainId) -> Option<&Train> {
        self.trains.get(id)
    }

    pub(crate) fn train_mut(&mut self, id: &TrainId) -> Option<&mut Train> {
        self.trains.get_mut(id)
    }

    pub fn contains_train(&self, id: &TrainId) -> bool {
        self.trains.contains_key(id)
    }

    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    pub(crate) fn trains_mut(&mut self) -> impl Iterator<Item = &mut Train> {
        self.trains.values_mut()
    }

    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    pub fn signals(&self) -> &[(SignalId, SignalAspect)] {
        &self.signals
    }

    pub fn loop_track(&self) -> &Occupancy {
        &self.loop_track
    }

    /// Set the loop siding occupancy
    ///
    /// The siding holds at most one train; occupying it while another train
    /// is recorded there is a scenario authoring error, logged but applied
    /// (the last writer wins, matching single-occupant-by-construction).
    pub fn set_loop_occupancy(&mut self, occupancy: Occupancy) {
        if let (Occupancy::OccupiedBy(current), Occupancy::OccupiedBy(next)) =
            (&self.loop_track, &occupancy)
        {
            if current != next {
                warn!(
                    "loop siding occupied by {} while assigning {}",
                    current, next
                );
            }
        }
        self.loop_track = occupancy;
    }
}

/// The fixed template set the corridor is seeded from
///
/// Two up services and two down services; the goods special 01560 is the
/// low-priority train the reference scenario holds in the loop.
fn train_templates() -> Vec<Train> {
    vec![
        Train::new("12951", "Rajdhani Express", 4.5, 9, Line::Up),
        Train::new("01560", "Goods Special", 3.0, 2, Line::Up),
        Train::new("12952", "Shatabdi Express", -4.0, 8, Line::Down),
        Train::new("16340", "Nagercoil Express", -3.5, 5, Line::Down),
    ]
}
