//! Conflict policy seam
//!
//! The world asks a policy for actions once per tick, after movement. The
//! shipped implementation replays a fixed scenario table; a rule-based or
//! solver-backed policy can slot in behind the same trait without touching
//! the tick driver or the movement model.

use super::registry::EntityRegistry;
use super::scenario::{Scenario, ScenarioAction};

/// Decides what, if anything, to change about the corridor each tick
pub trait ConflictPolicy: Send {
    /// Actions to apply for this tick, in order
    fn evaluate(&mut self, tick: u64, registry: &EntityRegistry) -> Vec<ScenarioAction>;
}

/// Replays a validated scenario table
///
/// Stateless beyond the table itself: each entry fires at most once because
/// the tick counter is strictly increasing, so replay after a reset starts
/// cleanly from tick zero.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    scenario: Scenario,
}

impl ScriptedPolicy {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }
}

impl ConflictPolicy for ScriptedPolicy {
    fn evaluate(&mut self, tick: u64, _registry: &EntityRegistry) -> Vec<ScenarioAction> {
        self.scenario.actions_at(tick).cloned().collect()
    }
}

/// A policy that never intervenes; useful for movement-only runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPolicy;

impl ConflictPolicy for NullPolicy {
    fn evaluate(&mut self, _tick: u64, _registry: &EntityRegistry) -> Vec<ScenarioAction> {
        Vec::new()
    }
}
