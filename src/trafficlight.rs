/*
 * A traffic light that cycles between red and green on its own thread.
 *
 * Every phase lasts a random whole number of time units. Each change is
 * published on a hand-off queue, and vehicles that want to cross block on
 * that queue until they are handed a green.
 *
 * The light owns its cycling thread. `stop()` (or dropping the light) closes
 * the queue, which releases every blocked vehicle, and joins the thread.
 */

pub mod cycle;
pub mod queue;

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::phase::{AtomicPhase, Phase};
use cycle::{CycleRange, CycleTimer};
use queue::MessageQueue;

/// A phase change as published by the cycling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    /// Counts toggles, the first one is 1.
    pub sequence: u64,
}

#[derive(Debug)]
struct Shared {
    config: Config,
    phase: AtomicPhase,
    transitions: AtomicU64,
    stopping: AtomicBool,
    queue: MessageQueue<Transition>,
}

#[derive(Debug)]
enum Cycler {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

#[derive(Debug)]
pub struct TrafficLight {
    shared: Arc<Shared>,
    cycler: Mutex<Cycler>,
}

impl TrafficLight {
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        TrafficLight {
            shared: Arc::new(Shared {
                config,
                phase: AtomicPhase::new(Phase::Red),
                transitions: AtomicU64::new(0),
                stopping: AtomicBool::new(false),
                queue: MessageQueue::new(config.delivery),
            }),
            cycler: Mutex::new(Cycler::Idle),
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Number of phase changes so far.
    pub fn transitions(&self) -> u64 {
        self.shared.transitions.load(Ordering::SeqCst)
    }

    /// Spawns the cycling thread and returns right away. A light cycles at
    /// most once: it cannot be started twice, nor restarted after `stop()`.
    pub fn start(&self) -> Result<()> {
        let mut cycler = self.cycler.lock();
        match *cycler {
            Cycler::Idle => {}
            Cycler::Running(_) => return Err(Error::AlreadyStarted),
            Cycler::Stopped => return Err(Error::Stopped),
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("traffic-light".into())
            .spawn(move || cycle_through_phases(&shared))
            .map_err(Error::Spawn)?;
        *cycler = Cycler::Running(handle);

        let range = CycleRange::from(&self.shared.config);
        info!(
            min = ?range.min(),
            max = ?range.max(),
            delivery = ?self.shared.queue.delivery(),
            "traffic light started"
        );
        Ok(())
    }

    /*
     * Blocks until this waiter is handed a green.
     *
     * Under LIFO delivery a waiter can dig up greens that were published
     * before it started waiting. Those are thrown away, so the green we return
     * on was current at some point after the call. It may well be red again by
     * the time the caller looks.
     */
    pub fn wait_for_green(&self) -> Result<Transition> {
        let since = self.transitions();
        loop {
            let transition = self.shared.queue.receive()?;
            if is_fresh_green(&transition, since) {
                return Ok(transition);
            }
            trace!(phase = %transition.phase, sequence = transition.sequence, "still waiting for green");
        }
    }

    /// Like `wait_for_green`, but gives up with `Ok(None)` after `timeout`.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> Result<Option<Transition>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for_green().map(Some);
        };
        let since = self.transitions();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.receive_timeout(remaining)? {
                Some(transition) if is_fresh_green(&transition, since) => {
                    return Ok(Some(transition));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }
    }

    /// Stops cycling, releases every waiter with `Error::Closed` and joins the
    /// cycling thread. Calling it again does nothing.
    pub fn stop(&self) {
        let mut cycler = self.cycler.lock();
        self.shared.stopping.store(true, Ordering::SeqCst);
        self.shared.queue.close();

        match mem::replace(&mut *cycler, Cycler::Stopped) {
            Cycler::Running(handle) => {
                if handle.join().is_err() {
                    warn!("traffic light cycling thread panicked");
                }
                info!(transitions = self.transitions(), "traffic light stopped");
            }
            Cycler::Idle | Cycler::Stopped => {}
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.stop();
    }
}

fn is_fresh_green(transition: &Transition, since: u64) -> bool {
    transition.phase.is_green() && transition.sequence >= since
}

fn cycle_through_phases(shared: &Shared) {
    let mut rng = rand::rng();
    let mut timer = CycleTimer::new(CycleRange::from(&shared.config), Instant::now(), &mut rng);

    while !shared.stopping.load(Ordering::SeqCst) {
        thread::sleep(shared.config.poll_interval);

        if !timer.expired(Instant::now()) {
            continue;
        }

        // Count first, so a waiter that reads sequence n never sees the
        // phase of n + 1 yet.
        let phase = shared.phase.load().toggle();
        let sequence = shared.transitions.fetch_add(1, Ordering::SeqCst) + 1;
        shared.phase.store(phase);
        shared.queue.send(Transition { phase, sequence });
        debug!(%phase, sequence, lasted = ?timer.duration(), "phase changed");

        timer.restart(Instant::now(), &mut rng);
    }
}
