/*
 * A traffic light for simulations.
 *
 * The light cycles between red and green on a thread of its own, each phase
 * lasting four to six seconds. Vehicles on other threads call
 * `TrafficLight::wait_for_green` and block until the light hands them a
 * green.
 */

pub mod config;
pub mod error;
pub mod logging;
pub mod phase;
pub mod trafficlight;

pub use config::Config;
pub use error::{Error, Result};
pub use phase::Phase;
pub use trafficlight::queue::{Delivery, MessageQueue};
pub use trafficlight::{TrafficLight, Transition};
