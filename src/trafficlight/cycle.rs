/*
 * How long a phase lasts.
 *
 * In order to keep this module testable we keep all sleeping outside of it.
 * The cycling thread passes in the current time, tests pass in whatever
 * instant they like.
 */

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRange {
    min_units: u32,
    max_units: u32,
    time_unit: Duration,
}

impl CycleRange {
    pub fn new(min_units: u32, max_units: u32, time_unit: Duration) -> Self {
        CycleRange {
            min_units,
            max_units,
            time_unit,
        }
    }

    pub fn min(&self) -> Duration {
        self.time_unit.saturating_mul(self.min_units)
    }

    pub fn max(&self) -> Duration {
        self.time_unit.saturating_mul(self.max_units)
    }

    /// A whole number of time units, uniform over the inclusive range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let units = rng.random_range(self.min_units..=self.max_units);
        self.time_unit.saturating_mul(units)
    }
}

impl From<&Config> for CycleRange {
    fn from(config: &Config) -> Self {
        CycleRange::new(config.min_units, config.max_units, config.time_unit)
    }
}

#[derive(Debug)]
pub struct CycleTimer {
    range: CycleRange,
    started: Instant,
    duration: Duration,
}

impl CycleTimer {
    pub fn new<R: Rng>(range: CycleRange, now: Instant, rng: &mut R) -> Self {
        CycleTimer {
            range,
            started: now,
            duration: range.sample(rng),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Starts the next phase at `now` with a freshly drawn duration.
    pub fn restart<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        self.started = now;
        self.duration = self.range.sample(rng);
    }
}
