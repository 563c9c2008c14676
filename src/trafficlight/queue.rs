/*
 * A module that hands phase changes from the light to whoever is waiting.
 *
 * The queue is unbounded: `send` never waits for a consumer. Each value is
 * handed to exactly one `receive`, there is no broadcast. By default the
 * newest value is handed out first, so a receiver that falls behind sees the
 * current phase and may never see the ones in between.
 */

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};

/// Which queued value a receiver gets first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Newest first.
    #[default]
    Lifo,
    /// Oldest first.
    Fifo,
}

#[derive(Debug)]
struct State<T> {
    messages: VecDeque<T>,
    closed: bool,
}

#[derive(Debug)]
pub struct MessageQueue<T> {
    state: Mutex<State<T>>,
    condvar: Condvar,
    delivery: Delivery,
}

impl<T> MessageQueue<T> {
    pub fn new(delivery: Delivery) -> Self {
        MessageQueue {
            state: Mutex::new(State {
                messages: VecDeque::new(),
                closed: false,
            }),
            condvar: Condvar::new(),
            delivery,
        }
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Queues `message` and wakes one receiver. Dropped once the queue is
    /// closed.
    pub fn send(&self, message: T) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.messages.push_back(message);
        }
        self.condvar.notify_one();
    }

    /// Blocks until a message is available and takes it.
    pub fn receive(&self) -> Result<T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(Error::Closed);
            }
            if let Some(message) = self.pop(&mut state) {
                return Ok(message);
            }
            self.condvar.wait(&mut state);
        }
    }

    /// Like `receive`, but gives up with `Ok(None)` after `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<Option<T>> {
        // Too far out to be represented as an instant: same as no timeout.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.receive().map(Some);
        };
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(Error::Closed);
            }
            if let Some(message) = self.pop(&mut state) {
                return Ok(Some(message));
            }
            if self.condvar.wait_until(&mut state, deadline).timed_out() {
                // A send may have slipped in right at the deadline.
                if state.closed {
                    return Err(Error::Closed);
                }
                return Ok(self.pop(&mut state));
            }
        }
    }

    pub fn try_receive(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        self.pop(&mut state)
    }

    /// Wakes every receiver. They, and every later receive, get
    /// `Error::Closed`.
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.messages.clear();
        }
        self.condvar.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }

    fn pop(&self, state: &mut State<T>) -> Option<T> {
        match self.delivery {
            Delivery::Lifo => state.messages.pop_back(),
            Delivery::Fifo => state.messages.pop_front(),
        }
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        MessageQueue::new(Delivery::default())
    }
}
