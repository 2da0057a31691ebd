//! Wall-clock tick driver tests
//!
//! Timing assertions use generous windows so they hold on loaded CI
//! machines: they check stream multiplicity and ordering, not exact
//! cadence.

use std::thread;
use std::time::Duration;

use rail_sim::simulation::{
    LogCategory, NullPolicy, OptimizerStatus, SimWorld, TickDriver, TrainId,
};

const PERIOD: Duration = Duration::from_millis(20);

fn movement_only_driver() -> TickDriver {
    TickDriver::with_period(SimWorld::with_policy(Box::new(NullPolicy)), PERIOD)
}

#[test]
fn starting_twice_keeps_a_single_tick_stream() {
    let mut driver = movement_only_driver();

    driver.start();
    driver.start();
    assert!(driver.is_running());

    thread::sleep(Duration::from_millis(300));
    driver.stop();

    // One 20ms stream over 300ms lands near 15 ticks; a duplicate stream
    // would land near 30.
    let ticks = driver.current_tick();
    assert!(ticks >= 5, "driver barely ticked: {}", ticks);
    assert!(ticks <= 22, "tick rate implies duplicate streams: {}", ticks);
}

#[test]
fn stop_halts_the_tick_stream_synchronously() {
    let mut driver = movement_only_driver();
    driver.start();
    thread::sleep(Duration::from_millis(100));
    driver.stop();
    assert!(!driver.is_running());

    let ticks_at_stop = driver.current_tick();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(driver.current_tick(), ticks_at_stop);
}

#[test]
fn stop_retains_the_tick_counter_and_restart_continues() {
    let mut driver = movement_only_driver();
    driver.start();
    thread::sleep(Duration::from_millis(100));
    driver.stop();

    let retained = driver.current_tick();
    assert!(retained > 0);

    driver.start();
    thread::sleep(Duration::from_millis(100));
    driver.stop();
    assert!(driver.current_tick() > retained);
}

#[test]
fn reset_stops_the_driver_and_zeroes_everything() {
    let mut driver = movement_only_driver();
    driver.start();
    thread::sleep(Duration::from_millis(100));

    driver.reset();

    assert!(!driver.is_running());
    assert_eq!(driver.current_tick(), 0);
    driver.with_world(|world| {
        assert_eq!(world.sink().event_count(), 0);
        assert_eq!(world.sink().alert_count(), 0);
        assert_eq!(world.optimizer_status(), OptimizerStatus::Monitoring);
    });
}

#[test]
fn disruption_arms_the_deferred_reoptimization() {
    let mut driver = movement_only_driver();
    driver.set_reoptimize_delay(Duration::from_millis(10));

    driver.inject_disruption(&TrainId::from("01560"));
    thread::sleep(Duration::from_millis(150));

    driver.with_world(|world| {
        assert_eq!(world.optimizer_status(), OptimizerStatus::Reoptimizing);
        assert!(world
            .sink()
            .events()
            .iter()
            .any(|e| e.category == LogCategory::Conflict));
        assert!(world
            .sink()
            .events()
            .iter()
            .any(|e| e.message.contains("Re-optimization")));
    });
}

/// A reset landing inside the deferred window invalidates the pending
/// follow-up: the freshly-reset world must stay monitoring with an empty
/// sink once the delay elapses.
#[test]
fn reset_cancels_the_pending_reoptimization() {
    let mut driver = movement_only_driver();
    driver.set_reoptimize_delay(Duration::from_millis(60));

    driver.inject_disruption(&TrainId::from("01560"));
    driver.reset();
    thread::sleep(Duration::from_millis(200));

    driver.with_world(|world| {
        assert_eq!(world.optimizer_status(), OptimizerStatus::Monitoring);
        assert_eq!(world.sink().event_count(), 0);
        assert_eq!(world.sink().alert_count(), 0);
    });
}

#[test]
fn rejected_disruption_does_not_arm_reoptimization() {
    let mut world = SimWorld::with_policy(Box::new(NullPolicy));
    world.run_ticks(30); // every train has completed or is far along
    let mut driver = TickDriver::with_period(world, PERIOD);
    driver.set_reoptimize_delay(Duration::from_millis(10));

    driver.inject_disruption(&TrainId::from("12951"));
    thread::sleep(Duration::from_millis(100));

    driver.with_world(|world| {
        assert_eq!(world.optimizer_status(), OptimizerStatus::Monitoring);
        assert_eq!(
            world
                .sink()
                .events()
                .iter()
                .filter(|e| e.category == LogCategory::Warning)
                .count(),
            1
        );
    });
}
