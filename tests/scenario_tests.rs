//! Scenario table validation and the reference corridor end-to-end run

use rail_sim::simulation::{
    reference_scenario, EntityRegistry, LogCategory, Occupancy, OptimizerStatus, Route, Scenario,
    ScenarioAction, ScenarioEvent, SimWorld, TrainId, TrainStatus,
};

#[test]
fn duplicate_trigger_ticks_fail_validation() {
    let registry = EntityRegistry::new();
    let events = vec![
        ScenarioEvent::new(
            5,
            vec![ScenarioAction::Log {
                message: "first".to_string(),
                category: LogCategory::Info,
            }],
        ),
        ScenarioEvent::new(
            5,
            vec![ScenarioAction::Log {
                message: "second".to_string(),
                category: LogCategory::Info,
            }],
        ),
    ];

    let err = Scenario::new(events, &registry).unwrap_err();
    assert!(err.to_string().contains("tick 5"));
}

#[test]
fn unknown_train_reference_fails_validation() {
    let registry = EntityRegistry::new();
    let events = vec![ScenarioEvent::new(
        2,
        vec![ScenarioAction::SetRoute {
            train: TrainId::from("99999"),
            route: Route::Loop,
        }],
    )];

    let err = Scenario::new(events, &registry).unwrap_err();
    assert!(err.to_string().contains("99999"));
}

#[test]
fn loop_occupancy_reference_is_validated_too() {
    let registry = EntityRegistry::new();
    let events = vec![ScenarioEvent::new(
        2,
        vec![ScenarioAction::SetLoopOccupancy(Occupancy::OccupiedBy(
            TrainId::from("99999"),
        ))],
    )];

    assert!(Scenario::new(events, &registry).is_err());
}

#[test]
fn reference_scenario_validates_against_templates() {
    let registry = EntityRegistry::new();
    let scenario = reference_scenario(&registry).expect("reference scenario is valid");
    assert!(scenario.event_count() > 0);
    assert_eq!(scenario.final_tick(), Some(28));
}

/// The reference run through tick 28: feed start at tick 1, two conflicts at
/// tick 3, STABLE at tick 28, and the goods special through the loop in
/// between.
#[test]
fn reference_run_produces_the_expected_timeline() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    let goods = TrainId::from("01560");

    let mut saw_loop_route = false;
    for tick in 1..=28u64 {
        world.tick();
        if (6..=23).contains(&tick) {
            if world.registry().train(&goods).unwrap().route == Route::Loop {
                saw_loop_route = true;
            }
        }
    }
    assert!(saw_loop_route, "01560 never routed through the loop");

    let events = world.sink().events();
    let feed_started = events
        .iter()
        .position(|e| e.message == "High-density feed started")
        .expect("feed start entry");
    assert_eq!(events[feed_started].tick, 1);

    let conflicts: Vec<_> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.category == LogCategory::Conflict)
        .collect();
    assert_eq!(conflicts.len(), 2);
    assert!(conflicts.iter().all(|(_, e)| e.tick == 3));
    assert!(conflicts.iter().all(|(i, _)| *i > feed_started));

    let stable = events
        .iter()
        .position(|e| e.message == "Optimizer status: STABLE")
        .expect("stable entry");
    assert_eq!(events[stable].tick, 28);
    assert!(stable > conflicts.last().unwrap().0);

    assert_eq!(world.optimizer_status(), OptimizerStatus::Stable);
}

#[test]
fn goods_special_is_held_and_released_with_residual_delay() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    let goods = TrainId::from("01560");

    world.run_ticks(10);
    let held = world.registry().train(&goods).unwrap();
    assert_eq!(held.status, TrainStatus::Halted);
    assert_eq!(held.route, Route::Loop);
    assert_eq!(
        world.registry().loop_track(),
        &Occupancy::OccupiedBy(goods.clone())
    );

    world.run_ticks(18);
    let released = world.registry().train(&goods).unwrap();
    assert_eq!(released.status, TrainStatus::Running);
    assert_eq!(released.route, Route::Main);
    assert_eq!(released.delay_minutes, 12);
    assert_eq!(world.registry().loop_track(), &Occupancy::Empty);
}

#[test]
fn scenario_entries_fire_exactly_once() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    world.run_ticks(40);

    let feed_entries = world
        .sink()
        .events()
        .iter()
        .filter(|e| e.message == "High-density feed started")
        .count();
    assert_eq!(feed_entries, 1);
}

#[test]
fn reset_replays_the_script_identically() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    world.run_ticks(28);
    let first: Vec<_> = world
        .sink()
        .events()
        .iter()
        .map(|e| (e.tick, e.message.clone()))
        .collect();

    world.reset();
    world.run_ticks(28);
    let second: Vec<_> = world
        .sink()
        .events()
        .iter()
        .map(|e| (e.tick, e.message.clone()))
        .collect();

    assert_eq!(first, second);
}

/// A disruption aimed at a train that already completed must not disturb
/// the settled optimizer state: no breakdown, no re-optimization, just the
/// single warning entry.
#[test]
fn rejected_disruption_preserves_the_settled_optimizer_state() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    let express = TrainId::from("12951");

    world.run_ticks(28);
    assert_eq!(world.optimizer_status(), OptimizerStatus::Stable);
    assert_eq!(
        world.registry().train(&express).unwrap().status,
        TrainStatus::Completed
    );

    let applied = world.inject_disruption(&express);
    assert!(!applied, "injection on a completed train must be rejected");

    assert_eq!(world.optimizer_status(), OptimizerStatus::Stable);
    assert_eq!(
        world.registry().train(&express).unwrap().status,
        TrainStatus::Completed
    );
    let warnings = world
        .sink()
        .events()
        .iter()
        .filter(|e| e.category == LogCategory::Warning)
        .count();
    assert_eq!(warnings, 1);
}

#[test]
fn express_overtakes_while_goods_is_held() {
    let mut world = SimWorld::new().expect("reference scenario is valid");
    let goods = TrainId::from("01560");
    let express = TrainId::from("12951");

    world.run_ticks(20);
    let goods_pos = world.registry().train(&goods).unwrap().position;
    let express_pos = world.registry().train(&express).unwrap().position;
    assert!(
        express_pos > goods_pos,
        "express ({}) should have overtaken the held goods train ({})",
        express_pos,
        goods_pos
    );
}
