/*
 * Settings for a traffic light.
 *
 * The defaults are what a real light at an intersection would use: a phase
 * lasts between four and six whole seconds and the cycling thread checks its
 * timer every millisecond. Tests shrink the time unit so that a full cycle
 * takes a few tens of milliseconds instead.
 */

use std::time::Duration;

use crate::error::{Error, Result};
use crate::trafficlight::queue::Delivery;

pub const DEFAULT_MIN_UNITS: u32 = 4;
pub const DEFAULT_MAX_UNITS: u32 = 6;
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Shortest phase, in time units. Inclusive.
    pub min_units: u32,
    /// Longest phase, in time units. Inclusive.
    pub max_units: u32,
    pub time_unit: Duration,
    /// How often the cycling thread looks at its timer and the stop flag.
    pub poll_interval: Duration,
    pub delivery: Delivery,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_units: DEFAULT_MIN_UNITS,
            max_units: DEFAULT_MAX_UNITS,
            time_unit: DEFAULT_TIME_UNIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            delivery: Delivery::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_cycle_units(mut self, min_units: u32, max_units: u32) -> Self {
        self.min_units = min_units;
        self.max_units = max_units;
        self
    }

    #[must_use]
    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_units == 0 || self.min_units > self.max_units {
            return Err(Error::InvalidCycleRange {
                min: self.min_units,
                max: self.max_units,
            });
        }
        if self.time_unit.is_zero() || self.poll_interval.is_zero() {
            return Err(Error::InvalidTimeUnit);
        }
        Ok(())
    }

    /// Longest a single phase can last.
    pub fn max_cycle(&self) -> Duration {
        self.time_unit.saturating_mul(self.max_units)
    }
}
