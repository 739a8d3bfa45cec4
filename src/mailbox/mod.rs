/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Blocking, mask-filterable FIFO mailbox.
//!
//! The [`Mailbox`] is the only serialization point between the timer thread,
//! caller threads and the sequencer's processing thread. It supports
//! non-blocking and blocking retrieval, selective ("masked") retrieval that
//! only ever looks at the head element, and an explicit cancellation signal
//! that unblocks every waiter.
//!
//! Failure is always reported as `None`: an empty queue, a cancelled wait
//! and a head rejected by a mask all look the same to the caller.
//!
//! # Examples
//!
//! ```
//! use effect_sequencer::Mailbox;
//!
//! let mailbox = Mailbox::new();
//! mailbox.send("a");
//! mailbox.send("b");
//!
//! // The head is "a", so a mask accepting only "b" does not scan past it.
//! assert_eq!(mailbox.poll_masked(&["b"], true), None);
//! assert_eq!(mailbox.poll(), Some("a"));
//! assert_eq!(mailbox.poll_masked(&["b"], true), Some("b"));
//! ```

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[cfg(test)]
mod tests;

#[derive(Debug)]
struct MailboxState<T> {
    queue: VecDeque<T>,
    /// Level-triggered; cleared by the next `send`.
    cancelled: bool,
    /// Number of threads parked in `wait_masked`.
    masked_waiters: usize,
}

/// Thread-safe FIFO queue with blocking, masked and cancellable retrieval.
///
/// The internal lock only covers queue mutation and the wake-up condition;
/// it is never held while the caller handles a returned item.
#[derive(Debug)]
pub struct Mailbox<T> {
    state: Mutex<MailboxState<T>>,
    ready: Condvar,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MailboxState {
                queue: VecDeque::new(),
                cancelled: false,
                masked_waiters: 0,
            }),
            ready: Condvar::new(),
        }
    }

    /// Appends `item` to the tail and wakes a waiter.
    ///
    /// Sending always succeeds and clears a pending cancellation, so a
    /// mailbox can be reused after [`cancel_wait`](Self::cancel_wait).
    pub fn send(&self, item: T) {
        let mut state = self.state.lock();
        state.cancelled = false;
        state.queue.push_back(item);
        // A masked waiter may reject the new item, so everyone re-checks.
        let wake_all = state.masked_waiters > 0;
        drop(state);

        if wake_all {
            self.ready.notify_all();
        } else {
            self.ready.notify_one();
        }
    }

    /// Removes and returns the head, or `None` if the mailbox is empty.
    pub fn poll(&self) -> Option<T> {
        let mut state = self.state.lock();
        let item = state.queue.pop_front();
        if item.is_some() {
            self.head_changed(&state);
        }
        item
    }

    /// Blocks until an item is available or the wait is cancelled.
    ///
    /// Returns `None` on cancellation and leaves the queue untouched.
    pub fn wait(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.queue.is_empty() && !state.cancelled {
            self.ready.wait(&mut state);
        }
        self.take_head(&mut state)
    }

    /// Like [`wait`](Self::wait), but gives up once `timeout` has elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.queue.is_empty() && !state.cancelled {
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        self.take_head(&mut state)
    }

    /// Wakes every waiter with `None` until the next [`send`](Self::send).
    ///
    /// Idempotent.
    pub fn cancel_wait(&self) {
        self.state.lock().cancelled = true;
        self.ready.notify_all();
    }

    /// Returns `true` while a cancellation is pending.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Returns the number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Returns `true` if no item is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    fn take_head(&self, state: &mut MutexGuard<'_, MailboxState<T>>) -> Option<T> {
        if state.cancelled {
            return None;
        }
        let item = state.queue.pop_front();
        if item.is_some() {
            self.head_changed(state);
        }
        item
    }

    /// Masked waiters only look at the head, so a new head must wake them.
    fn head_changed(&self, state: &MailboxState<T>) {
        if state.masked_waiters > 0 && !state.queue.is_empty() {
            self.ready.notify_all();
        }
    }
}

impl<T: PartialEq> Mailbox<T> {
    /// Removes the head iff `(head ∈ mask) == accept_if_present`.
    ///
    /// Only the head is inspected. When it fails the test the queue is left
    /// exactly as it was and `None` is returned, even if a later item would
    /// have matched.
    pub fn poll_masked(&self, mask: &[T], accept_if_present: bool) -> Option<T> {
        let mut state = self.state.lock();
        if !head_matches(&state, mask, accept_if_present) {
            return None;
        }
        let item = state.queue.pop_front();
        self.head_changed(&state);
        item
    }

    /// Blocks until the head passes the mask test or the wait is cancelled.
    ///
    /// The head is re-checked every time it changes. A non-matching head keeps
    /// this call parked until another consumer removes it. Returns `None` only
    /// on cancellation.
    pub fn wait_masked(&self, mask: &[T], accept_if_present: bool) -> Option<T> {
        let mut state = self.state.lock();
        state.masked_waiters += 1;
        let item = loop {
            if state.cancelled {
                break None;
            }
            if head_matches(&state, mask, accept_if_present) {
                break state.queue.pop_front();
            }
            self.ready.wait(&mut state);
        };
        state.masked_waiters -= 1;
        if item.is_some() {
            self.head_changed(&state);
        }
        item
    }
}

fn head_matches<T: PartialEq>(state: &MailboxState<T>, mask: &[T], accept_if_present: bool) -> bool {
    state
        .queue
        .front()
        .is_some_and(|head| mask.contains(head) == accept_if_present)
}
