//! Bounded multi-consumer queue with end-of-stream and stop semantics.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Why a push was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// Production has been marked complete; no further items are accepted.
    #[error("queue is closed to new items")]
    Closed,

    /// A stop was requested; the queue no longer accepts or delivers items.
    #[error("queue was stopped")]
    Stopped,
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
    stopped: bool,
}

/// A capacity-bounded holding area for pending work items.
///
/// One producer role, many concurrent consumers. `push` blocks when the queue
/// is at capacity; `pop` blocks when it is empty and production is still open.
/// No item is ever delivered to two consumers.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity.min(1024)),
                closed: false,
                stopped: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Add an item, blocking while the queue is at capacity.
    ///
    /// Blocking on a full queue is backpressure, not an error. The call fails
    /// only once the queue has been closed or stopped; a producer blocked on a
    /// full queue is woken and fails fast when either happens.
    pub fn push(&self, item: T) -> Result<(), PushError> {
        let mut inner = self.inner.lock();
        loop {
            if inner.stopped {
                return Err(PushError::Stopped);
            }
            if inner.closed {
                return Err(PushError::Closed);
            }
            if inner.items.len() < self.capacity {
                inner.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }
            self.not_full.wait(&mut inner);
        }
    }

    /// Take the next item, blocking while the queue is empty and open.
    ///
    /// Returns `None` (end of stream) once the queue is empty and closed, or
    /// immediately after a stop regardless of remaining items.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        loop {
            if inner.stopped {
                return None;
            }
            if let Some(item) = inner.items.pop_front() {
                self.not_full.notify_one();
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Mark production complete. Idempotent.
    ///
    /// Consumers drain the remaining items and then observe end of stream.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Request a cooperative stop. Idempotent.
    ///
    /// All blocked producers and consumers are woken; consumers observe end of
    /// stream even if items remain.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.stopped = true;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Number of items currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Whether the queue is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }
}
