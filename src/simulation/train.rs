//! Train movement logic
//!
//! Per-tick position updates for a single train. The movement model is a
//! scalar integrator over the 0-100 track fraction; spacing and conflict
//! avoidance between trains is entirely the conflict policy's job, so no
//! collision checks happen here.

use super::types::{Line, Route, TrainId, TrainStatus, TRACK_END, TRACK_START};

/// Result of a train movement update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainUpdateResult {
    /// Train keeps running
    Continue,
    /// Train crossed its exit boundary this tick and is now `Completed`
    Completed,
    /// Train did not move (halted, broken down, or already completed)
    Stationary,
}

/// A train in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    /// Location along the corridor, 0-100 track fraction
    pub position: f64,
    /// Track fraction advanced per tick; positive for `Up`, negative for `Down`
    pub speed: f64,
    /// Higher value wins when the policy arbitrates a conflict
    pub priority: i32,
    /// Accumulated delay in minutes
    pub delay_minutes: u32,
    pub line: Line,
    pub route: Route,
    pub status: TrainStatus,
}

impl Train {
    pub fn new(
        id: impl Into<TrainId>,
        name: impl Into<String>,
        speed: f64,
        priority: i32,
        line: Line,
    ) -> Self {
        let position = match line {
            Line::Up => TRACK_START,
            Line::Down => TRACK_END,
        };
        Self {
            id: id.into(),
            name: name.into(),
            position,
            speed,
            priority,
            delay_minutes: 0,
            line,
            route: Route::Main,
            status: TrainStatus::Running,
        }
    }

    /// Advance the train by one tick
    ///
    /// Only `Running` trains move. Returns `Completed` exactly once, on the
    /// tick the train crosses its exit boundary; the position is clamped to
    /// the boundary so it never renders outside the corridor.
    pub fn advance(&mut self) -> TrainUpdateResult {
        if self.status != TrainStatus::Running {
            return TrainUpdateResult::Stationary;
        }

        self.position += self.speed;

        let at_exit = match self.line {
            Line::Up => self.position >= TRACK_END,
            Line::Down => self.position <= TRACK_START,
        };

        if at_exit {
            self.position = match self.line {
                Line::Up => TRACK_END,
                Line::Down => TRACK_START,
            };
            self.status = TrainStatus::Completed;
            TrainUpdateResult::Completed
        } else {
            TrainUpdateResult::Continue
        }
    }

    /// Whether the train still takes part in movement and rendering
    pub fn is_active(&self) -> bool {
        self.status != TrainStatus::Completed
    }
}
