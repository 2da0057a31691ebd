//! Main simulation world that ties everything together
//!
//! Owns the entity registry, the observability sink, the tick counter, and
//! the conflict policy. All state lives here; the tick driver and the CLI
//! are thin layers on top. This module has no UI dependency and is the
//! entry point for running the simulation headless.

use anyhow::Result;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use super::observability::ObservabilitySink;
use super::policy::{ConflictPolicy, ScriptedPolicy};
use super::registry::{EntityRegistry, TrainUpdate, UpdateOutcome};
use super::scenario::{reference_scenario, ScenarioAction};
use super::train::TrainUpdateResult;
use super::types::{
    Line, LogCategory, Occupancy, OptimizerStatus, Route, TrainId, TrainStatus,
    BREAKDOWN_DELAY_PENALTY, LOG_DISPLAY_WINDOW,
};

/// The main simulation world
pub struct SimWorld {
    registry: EntityRegistry,
    sink: ObservabilitySink,
    policy: Box<dyn ConflictPolicy>,
    tick: u64,
    optimizer: OptimizerStatus,
}

impl SimWorld {
    /// Create a world running the reference corridor scenario
    pub fn new() -> Result<Self> {
        let registry = EntityRegistry::new();
        let scenario = reference_scenario(&registry)?;
        Ok(Self::with_policy_and_registry(
            Box::new(ScriptedPolicy::new(scenario)),
            registry,
        ))
    }

    /// Create a world with a custom conflict policy
    pub fn with_policy(policy: Box<dyn ConflictPolicy>) -> Self {
        Self::with_policy_and_registry(policy, EntityRegistry::new())
    }

    fn with_policy_and_registry(policy: Box<dyn ConflictPolicy>, registry: EntityRegistry) -> Self {
        Self {
            registry,
            sink: ObservabilitySink::new(),
            policy,
            tick: 0,
            optimizer: OptimizerStatus::default(),
        }
    }

    /// Main simulation tick
    ///
    /// Advances the tick counter, moves every running train, marks boundary
    /// exits completed, then applies whatever the conflict policy asks for
    /// at the new tick.
    pub fn tick(&mut self) {
        self.tick += 1;

        // Movement pass
        let mut completed: Vec<(TrainId, String)> = Vec::new();
        for train in self.registry.trains_mut() {
            if let TrainUpdateResult::Completed = train.advance() {
                completed.push((train.id.clone(), train.name.clone()));
            }
        }
        for (id, name) in completed {
            debug!("train {} completed at tick {}", id, self.tick);
            self.sink.log_event(
                format!("Train {} ({}) completed its run", id, name),
                LogCategory::Info,
                self.tick,
            );
        }

        // Policy pass
        let actions = self.policy.evaluate(self.tick, &self.registry);
        for action in actions {
            self.apply_action(action);
        }
    }

    /// Advance the world synchronously by `n` ticks
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn apply_action(&mut self, action: ScenarioAction) {
        match action {
            ScenarioAction::SetRoute { train, route } => {
                self.apply_train_update(&train, TrainUpdate::route(route));
            }
            ScenarioAction::SetStatus { train, status } => {
                self.apply_train_update(&train, TrainUpdate::status(status));
            }
            ScenarioAction::SetDelay { train, minutes } => {
                self.apply_train_update(&train, TrainUpdate::delay(minutes));
            }
            ScenarioAction::SetLoopOccupancy(occupancy) => {
                self.registry.set_loop_occupancy(occupancy);
            }
            ScenarioAction::SetOptimizerStatus(status) => {
                self.optimizer = status;
            }
            ScenarioAction::Log { message, category } => {
                self.sink.log_event(message, category, self.tick);
            }
            ScenarioAction::Alert { message } => {
                self.sink.log_alert(message);
            }
        }
    }

    /// Merge a partial update into one train's record
    ///
    /// The external mutation surface consumers use outside the policy flow
    /// (the scenario goes through the same path). Rejected updates leave a
    /// warning entry in the sink.
    pub fn apply_update(&mut self, train: &TrainId, update: TrainUpdate) -> UpdateOutcome {
        self.apply_train_update(train, update)
    }

    fn apply_train_update(&mut self, train: &TrainId, update: TrainUpdate) -> UpdateOutcome {
        let outcome = self.registry.apply_update(train, update);
        match outcome {
            UpdateOutcome::Applied => {}
            UpdateOutcome::RejectedCompleted => {
                self.sink.log_event(
                    format!("Ignored update for completed train {}", train),
                    LogCategory::Warning,
                    self.tick,
                );
            }
            UpdateOutcome::UnknownTrain => {
                self.sink.log_event(
                    format!("Ignored update for unknown train {}", train),
                    LogCategory::Warning,
                    self.tick,
                );
            }
        }
        outcome
    }

    /// Inject a breakdown on the given train, outside the scenario flow
    ///
    /// A completed or unknown target gets exactly one warning entry and no
    /// state change. Returns true when the breakdown was applied, so the
    /// driver knows whether to arm the re-optimization follow-up.
    pub fn inject_disruption(&mut self, train: &TrainId) -> bool {
        let status = match self.registry.train(train) {
            Some(t) => t.status,
            None => {
                warn!("disruption for unknown train {}", train);
                self.sink.log_event(
                    format!("Disruption ignored: no train {}", train),
                    LogCategory::Warning,
                    self.tick,
                );
                return false;
            }
        };

        if status == TrainStatus::Completed {
            warn!("disruption for completed train {}", train);
            self.sink.log_event(
                format!("Disruption ignored: train {} already completed", train),
                LogCategory::Warning,
                self.tick,
            );
            return false;
        }

        // Registry rejects nothing here: the train is not completed.
        if let Some(t) = self.registry.train_mut(train) {
            t.status = TrainStatus::Breakdown;
            t.delay_minutes = BREAKDOWN_DELAY_PENALTY;
        }
        self.sink.log_event(
            format!(
                "Breakdown reported on {}: section blocked, {} min penalty",
                train, BREAKDOWN_DELAY_PENALTY
            ),
            LogCategory::Conflict,
            self.tick,
        );
        self.sink
            .log_alert(format!("Breakdown: train {} immobilized", train));
        true
    }

    /// Deferred follow-up to a disruption
    ///
    /// Only observability state changes: the displayed optimizer status
    /// flips to re-optimizing and an info entry is emitted. This is the hook
    /// a real re-planning pass would hang off.
    pub fn begin_reoptimization(&mut self) {
        self.optimizer = OptimizerStatus::Reoptimizing;
        self.sink.log_event(
            "Re-optimization pass started over remaining traffic",
            LogCategory::Info,
            self.tick,
        );
    }

    /// Return the world to its freshly-initialized state
    ///
    /// Tick counter zeroed, sink cleared, every entity back on template
    /// defaults, optimizer back to monitoring.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.sink.clear();
        self.registry.initialize();
        self.optimizer = OptimizerStatus::default();
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &ObservabilitySink {
        &self.sink
    }

    pub fn optimizer_status(&self) -> OptimizerStatus {
        self.optimizer
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Rail Corridor Summary ===");
        println!("Tick: {} | Optimizer: {}", self.tick, self.optimizer);
        println!("Trains: {}", self.registry.train_count());

        println!("--- Trains ---");
        let mut trains: Vec<_> = self.registry.trains().collect();
        trains.sort_by_key(|t| t.id.clone());
        for train in trains {
            println!(
                "  {} {:<18} pos={:5.1} {:<9} {:?}/{:?} delay={}min",
                train.id,
                train.name,
                train.position,
                train.status,
                train.line,
                train.route,
                train.delay_minutes
            );
        }

        match self.registry.loop_track() {
            Occupancy::Empty => println!("Loop siding: empty"),
            Occupancy::OccupiedBy(id) => println!("Loop siding: occupied by {}", id),
        }

        let signals: Vec<_> = self
            .registry
            .signals()
            .iter()
            .map(|(id, aspect)| format!("{}={:?}", id, aspect))
            .collect();
        println!("Signals: {}", signals.join(" "));

        let alerts: Vec<_> = self.sink.alerts().collect();
        if !alerts.is_empty() {
            println!("--- Alerts (newest first) ---");
            for alert in alerts {
                println!("  ! {}", alert);
            }
        }
    }

    /// Draw an ASCII picture of both running lines
    pub fn draw_map(&self) {
        const WIDTH: usize = 50;

        for line in [Line::Up, Line::Down] {
            let mut row = vec!['-'; WIDTH + 1];
            let mut active: Vec<_> = self
                .registry
                .trains()
                .filter(|t| t.line == line && t.is_active())
                .collect();
            active.sort_by_key(|t| OrderedFloat(t.position));

            for train in &active {
                let cell = ((train.position / 100.0) * WIDTH as f64).round() as usize;
                let cell = cell.min(WIDTH);
                row[cell] = match train.route {
                    Route::Loop => 'L',
                    Route::Main => match train.status {
                        TrainStatus::Breakdown => 'X',
                        TrainStatus::Halted => 'H',
                        _ => 'T',
                    },
                };
            }

            let label = match line {
                Line::Up => "UP  ",
                Line::Down => "DOWN",
            };
            let row: String = row.into_iter().collect();
            print!("{} |{}|", label, row);
            let ids: Vec<_> = active.iter().map(|t| t.id.as_str()).collect();
            println!("  [{}]", ids.join(", "));
        }
    }

    /// Print the display window of the event log
    pub fn print_recent_events(&self) {
        println!("--- Event log (last {}) ---", LOG_DISPLAY_WINDOW);
        for entry in self.sink.recent_events(LOG_DISPLAY_WINDOW) {
            println!("  [t{:>3}] {:<8} {}", entry.tick, entry.category, entry.message);
        }
    }
}
