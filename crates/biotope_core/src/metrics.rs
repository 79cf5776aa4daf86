//! Tick metrics and logging setup.
//!
//! Counters are atomics so the parallel evaluation pass can bump them
//! without holding `&mut` access to the host.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// How often a summary line is logged at `info`.
pub const SUMMARY_INTERVAL: u64 = 1000;

/// Running statistics for one host.
pub struct Metrics {
    tick_count: AtomicU64,
    creature_count: AtomicU64,
    food_count: AtomicU64,
    counters: Mutex<BTreeMap<&'static str, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            creature_count: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            counters: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick and logs a summary every [`SUMMARY_INTERVAL`] ticks.
    pub fn record_tick(&self, duration: Duration, creatures: usize, food: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.creature_count.store(creatures as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);

        if tick % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                tick,
                creatures,
                food,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Adds `amount` to a named counter.
    pub fn add(&self, name: &'static str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name).or_insert(0) += amount;
    }

    pub fn increment_counter(&self, name: &'static str) {
        self.add(name, 1);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn creature_count(&self) -> u64 {
        self.creature_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.creature_count.store(0, Ordering::Relaxed);
        self.food_count.store(0, Ordering::Relaxed);
        self.counters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Installs a global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
