//! Scenario tables: timed mutation scripts standing in for a live
//! conflict-resolution engine
//!
//! A scenario is an ordered table of (trigger tick, actions) entries. The
//! table is validated once at construction and never changes afterwards;
//! dispatch is a linear scan for entries matching the current tick, which
//! fire at most once because the tick counter is strictly increasing.

use anyhow::{bail, Result};

use super::registry::EntityRegistry;
use super::types::{LogCategory, Occupancy, OptimizerStatus, Route, TrainId, TrainStatus};

/// One mutation a scenario entry may apply
///
/// A closed data enum rather than a closure so tables can be validated
/// against the registry before the driver starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioAction {
    SetRoute { train: TrainId, route: Route },
    SetStatus { train: TrainId, status: TrainStatus },
    SetDelay { train: TrainId, minutes: u32 },
    SetLoopOccupancy(Occupancy),
    SetOptimizerStatus(OptimizerStatus),
    Log { message: String, category: LogCategory },
    Alert { message: String },
}

impl ScenarioAction {
    /// The train this action references, if any
    fn referenced_train(&self) -> Option<&TrainId> {
        match self {
            ScenarioAction::SetRoute { train, .. }
            | ScenarioAction::SetStatus { train, .. }
            | ScenarioAction::SetDelay { train, .. } => Some(train),
            ScenarioAction::SetLoopOccupancy(Occupancy::OccupiedBy(train)) => Some(train),
            _ => None,
        }
    }
}

/// A scenario table entry: all actions fired when the tick counter reaches
/// `tick`, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioEvent {
    pub tick: u64,
    pub actions: Vec<ScenarioAction>,
}

impl ScenarioEvent {
    pub fn new(tick: u64, actions: Vec<ScenarioAction>) -> Self {
        Self { tick, actions }
    }
}

/// An immutable, validated scenario table
#[derive(Debug, Clone)]
pub struct Scenario {
    events: Vec<ScenarioEvent>,
}

impl Scenario {
    /// Build a scenario table, validating it against the registry
    ///
    /// Malformed tables are a static configuration error caught here, not at
    /// runtime: trigger ticks must be unique and every referenced train must
    /// exist in the registry.
    pub fn new(mut events: Vec<ScenarioEvent>, registry: &EntityRegistry) -> Result<Self> {
        events.sort_by_key(|event| event.tick);

        for pair in events.windows(2) {
            if pair[0].tick == pair[1].tick {
                bail!("scenario defines tick {} more than once", pair[0].tick);
            }
        }

        for event in &events {
            for action in &event.actions {
                if let Some(train) = action.referenced_train() {
                    if !registry.contains_train(train) {
                        bail!(
                            "scenario tick {} references unknown train {}",
                            event.tick,
                            train
                        );
                    }
                }
            }
        }

        Ok(Self { events })
    }

    /// All actions scheduled for the given tick, in table order
    pub fn actions_at(&self, tick: u64) -> impl Iterator<Item = &ScenarioAction> {
        // Table is small; linear scan is sufficient.
        self.events
            .iter()
            .filter(move |event| event.tick == tick)
            .flat_map(|event| event.actions.iter())
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// The last trigger tick in the table, if any
    pub fn final_tick(&self) -> Option<u64> {
        self.events.last().map(|event| event.tick)
    }
}

/// The reference high-density corridor script
///
/// Holds the goods special 01560 in the loop siding while the Rajdhani
/// overtakes, then releases it with the residual delay and settles the
/// optimizer to STABLE.
pub fn reference_scenario(registry: &EntityRegistry) -> Result<Scenario> {
    let goods: TrainId = "01560".into();

    let events = vec![
        ScenarioEvent::new(
            1,
            vec![ScenarioAction::Log {
                message: "High-density feed started".to_string(),
                category: LogCategory::Info,
            }],
        ),
        ScenarioEvent::new(
            3,
            vec![
                ScenarioAction::Log {
                    message: "Conflict detected: 12951 closing on 01560, up main".to_string(),
                    category: LogCategory::Conflict,
                },
                ScenarioAction::Log {
                    message: "Conflict detected: block margin below threshold ahead of 01560"
                        .to_string(),
                    category: LogCategory::Conflict,
                },
                ScenarioAction::Alert {
                    message: "Section conflict on up main: 12951 / 01560".to_string(),
                },
            ],
        ),
        ScenarioEvent::new(
            4,
            vec![ScenarioAction::Log {
                message: "CP-SAT optimizer proposes: hold 01560 in loop, precedence to 12951"
                    .to_string(),
                category: LogCategory::Decision,
            }],
        ),
        ScenarioEvent::new(
            6,
            vec![
                ScenarioAction::SetRoute {
                    train: goods.clone(),
                    route: Route::Loop,
                },
                ScenarioAction::SetStatus {
                    train: goods.clone(),
                    status: TrainStatus::Halted,
                },
                ScenarioAction::SetLoopOccupancy(Occupancy::OccupiedBy(goods.clone())),
                ScenarioAction::Log {
                    message: "01560 routed into loop siding, holding for overtake".to_string(),
                    category: LogCategory::Decision,
                },
            ],
        ),
        ScenarioEvent::new(
            14,
            vec![ScenarioAction::Log {
                message: "12951 passing 01560 at line speed".to_string(),
                category: LogCategory::Info,
            }],
        ),
        ScenarioEvent::new(
            22,
            vec![
                ScenarioAction::SetStatus {
                    train: goods.clone(),
                    status: TrainStatus::Running,
                },
                ScenarioAction::SetRoute {
                    train: goods.clone(),
                    route: Route::Main,
                },
                ScenarioAction::SetLoopOccupancy(Occupancy::Empty),
                ScenarioAction::SetDelay {
                    train: goods,
                    minutes: 12,
                },
                ScenarioAction::Log {
                    message: "01560 released to up main, residual delay 12 min".to_string(),
                    category: LogCategory::Decision,
                },
            ],
        ),
        ScenarioEvent::new(
            28,
            vec![
                ScenarioAction::SetOptimizerStatus(OptimizerStatus::Stable),
                ScenarioAction::Log {
                    message: "Optimizer status: STABLE".to_string(),
                    category: LogCategory::Info,
                },
            ],
        ),
    ];

    Scenario::new(events, registry)
}
