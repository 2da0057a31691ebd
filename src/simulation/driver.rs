//! Wall-clock tick driver
//!
//! Runs the simulation on a fixed-period timer thread. The next tick is
//! armed only after the current handler completes, so tick handlers never
//! overlap, and all world access happens under one mutex: the single
//! logical thread the state machine assumes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use super::types::TrainId;
use super::world::SimWorld;

/// Default tick cadence: one simulated second per wall-clock second
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Delay before the post-disruption re-optimization hook fires
pub const REOPTIMIZE_DELAY: Duration = Duration::from_secs(1);

/// Drives a `SimWorld` from a repeating wall-clock timer
pub struct TickDriver {
    world: Arc<Mutex<SimWorld>>,
    period: Duration,
    reoptimize_delay: Duration,
    running: Arc<AtomicBool>,
    /// Bumped on reset so in-flight deferred follow-ups become stale
    epoch: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    pub fn new(world: SimWorld) -> Self {
        Self::with_period(world, DEFAULT_TICK_PERIOD)
    }

    pub fn with_period(world: SimWorld, period: Duration) -> Self {
        Self {
            world: Arc::new(Mutex::new(world)),
            period,
            reoptimize_delay: REOPTIMIZE_DELAY,
            running: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Override the re-optimization follow-up delay (tests use a short one)
    pub fn set_reoptimize_delay(&mut self, delay: Duration) {
        self.reoptimize_delay = delay;
    }

    /// Start the repeating timer
    ///
    /// A no-op while already running: the held thread handle guarantees at
    /// most one tick stream per driver.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            debug!("tick driver already running, start ignored");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        let world = Arc::clone(&self.world);
        let running = Arc::clone(&self.running);
        let period = self.period;

        self.handle = Some(thread::spawn(move || {
            loop {
                thread::sleep(period);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                lock(&world).tick();
            }
        }));
    }

    /// Stop the repeating timer
    ///
    /// Joins the timer thread, so no tick fires after this returns. The
    /// tick counter is retained until `reset`.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the driver and return the world to its initial state
    ///
    /// Also invalidates any pending re-optimization follow-up, so a reset
    /// landing inside the deferred window cannot be flipped back to
    /// re-optimizing by a stale one-shot.
    pub fn reset(&mut self) {
        self.stop();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        lock(&self.world).reset();
    }

    /// Inject a breakdown between ticks
    ///
    /// On a successful injection, arms the deferred re-optimization hook.
    pub fn inject_disruption(&mut self, train: &TrainId) {
        let applied = lock(&self.world).inject_disruption(train);
        if !applied {
            return;
        }

        let world = Arc::clone(&self.world);
        let delay = self.reoptimize_delay;
        let epoch = Arc::clone(&self.epoch);
        let armed_at = epoch.load(Ordering::SeqCst);
        thread::spawn(move || {
            thread::sleep(delay);
            let mut world = lock(&world);
            // The check runs under the lock: a reset that bumped the epoch
            // has already cleared the world by the time we see it.
            if epoch.load(Ordering::SeqCst) == armed_at {
                world.begin_reoptimization();
            }
        });
    }

    pub fn current_tick(&self) -> u64 {
        lock(&self.world).current_tick()
    }

    /// Run `f` against the world state under the lock
    pub fn with_world<R>(&self, f: impl FnOnce(&SimWorld) -> R) -> R {
        f(&lock(&self.world))
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(world: &Arc<Mutex<SimWorld>>) -> MutexGuard<'_, SimWorld> {
    // A poisoned lock means a tick handler panicked; the state is still the
    // last consistent snapshot, so keep serving it.
    match world.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
