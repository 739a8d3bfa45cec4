/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Listeners and the registry the sequencer broadcasts through.
//!
//! A [`Listener`] is a single capability, `on_event`, invoked synchronously by
//! the sequencer's processing thread for every event it broadcasts. Closures
//! are adapted with [`FnListener`] (every event) and [`MaskedListener`] (only
//! events equal to a mask). [`EventWaiter`] lets a caller thread block until
//! a particular event has been broadcast.

use crate::event::{Event, Payload};
use crate::mailbox::Mailbox;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Callback invoked for events broadcast by a running sequencer.
///
/// The return value reports whether the listener handled the event. It is
/// informational only: every registered listener sees every broadcast.
pub trait Listener<P: Payload = String>: Send + Sync {
    /// Handles a broadcast event.
    fn on_event(&self, event: &Event<P>) -> bool;
}

/// Shared handle to a registered listener.
pub type SharedListener<P = String> = Arc<dyn Listener<P>>;

/// Unconditional listener backed by a closure.
pub struct FnListener<F> {
    action: F,
}

impl<F> FnListener<F> {
    /// Wraps `action`, invoked for every broadcast event.
    #[must_use]
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<P, F> Listener<P> for FnListener<F>
where
    P: Payload,
    F: Fn(&Event<P>) -> bool + Send + Sync,
{
    fn on_event(&self, event: &Event<P>) -> bool {
        (self.action)(event)
    }
}

/// Listener that only reacts to events equal to its mask.
pub struct MaskedListener<P, F> {
    mask: Event<P>,
    action: F,
}

impl<P: Payload, F> MaskedListener<P, F> {
    /// Wraps `action`, invoked only for events equal to `mask`.
    #[must_use]
    pub fn new(mask: Event<P>, action: F) -> Self {
        Self { mask, action }
    }

    /// Returns the event this listener reacts to.
    #[must_use]
    pub fn mask(&self) -> &Event<P> {
        &self.mask
    }
}

impl<P, F> Listener<P> for MaskedListener<P, F>
where
    P: Payload,
    F: Fn(&Event<P>) -> bool + Send + Sync,
{
    fn on_event(&self, event: &Event<P>) -> bool {
        *event == self.mask && (self.action)(event)
    }
}

/// Caller-side helper that blocks until a given event has been broadcast.
///
/// The waiter forwards matching events into its own private mailbox from the
/// processing thread; the caller blocks on that mailbox, never on the
/// sequencer's.
///
/// # Examples
///
/// ```no_run
/// use effect_sequencer::{Control, Event, EventWaiter, Sequencer};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sequencer: Sequencer = Sequencer::new()?;
/// let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
/// sequencer.register_listener(stopped.clone());
/// sequencer.start();
/// sequencer.terminate();
/// stopped.wait_event();
/// # Ok(())
/// # }
/// ```
pub struct EventWaiter<P: Payload = String> {
    target: Event<P>,
    inbox: Mailbox<Event<P>>,
}

impl<P: Payload> EventWaiter<P> {
    /// Creates a waiter for `target`.
    #[must_use]
    pub fn new(target: Event<P>) -> Self {
        Self {
            target,
            inbox: Mailbox::new(),
        }
    }

    /// Returns the event being waited for.
    #[must_use]
    pub fn target(&self) -> &Event<P> {
        &self.target
    }

    /// Blocks until the target has been observed.
    ///
    /// Returns `false` if the wait was cancelled with [`cancel`](Self::cancel).
    pub fn wait_event(&self) -> bool {
        self.inbox.wait().is_some()
    }

    /// Blocks until the target has been observed or `timeout` elapses.
    pub fn wait_event_timeout(&self, timeout: Duration) -> bool {
        self.inbox.wait_timeout(timeout).is_some()
    }

    /// Consumes one pending observation without blocking.
    pub fn poll_event(&self) -> bool {
        self.inbox.poll().is_some()
    }

    /// Unblocks every thread parked in [`wait_event`](Self::wait_event).
    pub fn cancel(&self) {
        self.inbox.cancel_wait();
    }
}

impl<P: Payload> Listener<P> for EventWaiter<P> {
    fn on_event(&self, event: &Event<P>) -> bool {
        if *event == self.target {
            self.inbox.send(event.clone());
            return true;
        }
        false
    }
}

/// Opaque key of a registry entry, returned on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Mutex-protected, ordered collection of listeners.
///
/// Registration and removal may happen from any thread. [`broadcast`]
/// snapshots the list under the lock and invokes listeners outside of it, so
/// a listener may itself register or unregister listeners without
/// deadlocking, and such changes only apply to later broadcasts.
///
/// [`broadcast`]: ListenerRegistry::broadcast
pub struct ListenerRegistry<P: Payload = String> {
    entries: Mutex<Vec<(ListenerId, SharedListener<P>)>>,
}

impl<P: Payload> Default for ListenerRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> ListenerRegistry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends `listener`; it is invoked after every earlier registration.
    pub fn register(&self, listener: SharedListener<P>) -> ListenerId {
        let id = ListenerId::new();
        self.entries.lock().push((id, listener));
        id
    }

    /// Removes the entry registered under `id`.
    ///
    /// Returns `false` if no such entry exists.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Returns `true` if `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.lock().iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Invokes every listener, in registration order, with `event`.
    ///
    /// Returns how many listeners reported the event as handled.
    pub fn broadcast(&self, event: &Event<P>) -> usize {
        let snapshot: Vec<SharedListener<P>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut handled = 0;
        for listener in &snapshot {
            if listener.on_event(event) {
                handled += 1;
            }
        }
        handled
    }
}
