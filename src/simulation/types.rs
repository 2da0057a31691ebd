//! Core types for the train traffic simulation
//!
//! These are standalone types with no dependency on any UI layer.

use std::fmt;

/// A train identifier (railway running number, e.g. "01560")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(pub String);

impl TrainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A signal identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalId(pub String);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of travel along the corridor
///
/// `Up` trains run from track fraction 0 toward 100, `Down` trains from
/// 100 toward 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Up,
    Down,
}

/// Which track a train is currently assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The main running line
    Main,
    /// The loop siding, used to let higher-priority traffic overtake
    Loop,
}

/// Operational status of a train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    Running,
    Halted,
    Completed,
    Breakdown,
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainStatus::Running => "RUNNING",
            TrainStatus::Halted => "HALTED",
            TrainStatus::Completed => "COMPLETED",
            TrainStatus::Breakdown => "BREAKDOWN",
        };
        f.pad(s)
    }
}

/// Aspect shown by a lineside signal
///
/// Signals are static placeholders in this version: they are reset to
/// `Green` on initialization and nothing drives them from train positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAspect {
    Green,
    Red,
}

/// Occupancy state of a shared track resource (the loop siding)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Occupancy {
    #[default]
    Empty,
    OccupiedBy(TrainId),
}

/// Category tag on an emitted log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Info,
    Conflict,
    Decision,
    Warning,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogCategory::Info => "info",
            LogCategory::Conflict => "conflict",
            LogCategory::Decision => "decision",
            LogCategory::Warning => "warning",
        };
        f.pad(s)
    }
}

/// Displayed state of the optimization engine
///
/// Purely an observability value: no solver runs behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizerStatus {
    #[default]
    Monitoring,
    Reoptimizing,
    Stable,
}

impl fmt::Display for OptimizerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptimizerStatus::Monitoring => "MONITORING",
            OptimizerStatus::Reoptimizing => "RE-OPTIMIZING",
            OptimizerStatus::Stable => "STABLE",
        };
        write!(f, "{}", s)
    }
}

/// Start of the corridor in track-fraction units
pub const TRACK_START: f64 = 0.0;

/// End of the corridor in track-fraction units
pub const TRACK_END: f64 = 100.0;

/// Delay charged to a train when a breakdown is injected, in minutes
pub const BREAKDOWN_DELAY_PENALTY: u32 = 45;

/// Number of alerts retained for display, newest first
pub const ALERT_RETENTION: usize = 5;

/// Number of log entries consumers show by default
pub const LOG_DISPLAY_WINDOW: usize = 20;
