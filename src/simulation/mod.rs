//! Standalone train-traffic simulation core
//!
//! All simulation logic lives here, independent of any rendering layer.
//! A dashboard (or the headless CLI) consumes registry snapshots, the
//! observability sink, and the driver's start/stop/reset/disruption
//! controls.

mod driver;
mod observability;
mod policy;
mod registry;
mod scenario;
mod train;
mod types;
mod world;

// Re-export public types for external use
// These may not all be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use driver::{TickDriver, DEFAULT_TICK_PERIOD, REOPTIMIZE_DELAY};
#[allow(unused_imports)]
pub use observability::{LogEntry, ObservabilitySink};
#[allow(unused_imports)]
pub use policy::{ConflictPolicy, NullPolicy, ScriptedPolicy};
#[allow(unused_imports)]
pub use registry::{EntityRegistry, TrainUpdate, UpdateOutcome};
#[allow(unused_imports)]
pub use scenario::{reference_scenario, Scenario, ScenarioAction, ScenarioEvent};
#[allow(unused_imports)]
pub use train::{Train, TrainUpdateResult};
#[allow(unused_imports)]
pub use types::{
    Line, LogCategory, Occupancy, OptimizerStatus, Route, SignalAspect, SignalId, TrainId,
    TrainStatus, ALERT_RETENTION, BREAKDOWN_DELAY_PENALTY, LOG_DISPLAY_WINDOW, TRACK_END,
    TRACK_START,
};
pub use world::SimWorld;
