/*
 * The phase of a traffic light.
 *
 * This light only knows two phases. The phase is written by the cycling
 * thread and read by everyone else, so besides the plain enum there is a
 * small atomic cell that stores a phase by its ordinal.
 */

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};
use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    #[default]
    Red,
    Green,
}

impl Phase {
    pub const fn toggle(self) -> Self {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    pub const fn is_green(self) -> bool {
        matches!(self, Phase::Green)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Red => f.write_str("red"),
            Phase::Green => f.write_str("green"),
        }
    }
}

/// A phase that can be shared between threads.
#[derive(Debug)]
pub struct AtomicPhase(AtomicU8);

impl AtomicPhase {
    pub const fn new(phase: Phase) -> Self {
        AtomicPhase(AtomicU8::new(phase as u8))
    }

    pub fn load(&self) -> Phase {
        // Only ordinals of `Phase` are ever stored.
        Phase::from_ordinal(self.0.load(Ordering::SeqCst)).unwrap_or_default()
    }

    pub fn store(&self, phase: Phase) {
        self.0.store(phase.ordinal(), Ordering::SeqCst);
    }
}

impl Default for AtomicPhase {
    fn default() -> Self {
        AtomicPhase::new(Phase::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_is_identity() {
        for phase in Phase::VARIANTS {
            assert_eq!(phase.toggle().toggle(), *phase);
            assert_ne!(phase.toggle(), *phase);
        }
    }

    #[test]
    fn default_phase_is_red() {
        assert_eq!(Phase::default(), Phase::Red);
        assert_eq!(AtomicPhase::default().load(), Phase::Red);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Phase::Red.to_string(), "red");
        assert_eq!(Phase::Green.to_string(), "green");
    }

    #[test]
    fn atomic_phase_stores_and_loads() {
        let cell = AtomicPhase::new(Phase::Red);
        cell.store(Phase::Green);
        assert_eq!(cell.load(), Phase::Green);
        cell.store(cell.load().toggle());
        assert_eq!(cell.load(), Phase::Red);
    }

    #[test]
    fn only_two_phases() {
        assert_eq!(Phase::VARIANT_COUNT, 2);
    }
}
