/*
 * Errors for the traffic light and its hand-off queue.
 *
 * Nothing in here is a hardware or I/O fault in the usual sense. Most
 * variants report misuse (starting a light twice) or the cooperative shutdown
 * of a light that waiters were still blocked on.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `start()` was called on a light that is already cycling.
    #[error("traffic light is already started")]
    AlreadyStarted,

    /// `start()` was called on a light that has been stopped.
    #[error("traffic light has been stopped")]
    Stopped,

    /// The hand-off queue was closed while a receiver was waiting on it.
    #[error("phase queue is closed")]
    Closed,

    #[error("invalid cycle range: {min}..={max} time units")]
    InvalidCycleRange { min: u32, max: u32 },

    #[error("time unit and poll interval must be non-zero")]
    InvalidTimeUnit,

    #[error("failed to spawn a thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("vehicle {vehicle} panicked")]
    VehiclePanicked { vehicle: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
