/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Effect that reacts to another broadcast event.

use super::{Effect, EffectContext, Repeat};
use crate::event::{Event, Payload};
use crate::listener::{ListenerId, ListenerRegistry, MaskedListener};
use crate::mailbox::Mailbox;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Emits `reaction` every time `trigger` is broadcast.
///
/// On `init` the effect registers a masked listener for `trigger`. The
/// sequencer only broadcasts while RUNNING, so the effect reacts whenever the
/// sequencer runs, whether it got there through START or RESUME. By default it
/// reacts to every occurrence; a [`with_repeat`](Self::with_repeat) policy
/// bounds the number of reactions, and every `start` refills that budget.
pub struct TriggeredEffect<P: Payload = String> {
    trigger: Event<P>,
    reaction: Event<P>,
    repeat: Repeat,
    /// Reactions left; `None` once a bounded policy is used up.
    budget: Arc<Mutex<Option<Repeat>>>,
    binding: Option<(Weak<ListenerRegistry<P>>, ListenerId)>,
}

impl<P: Payload> TriggeredEffect<P> {
    /// Creates a detached effect emitting `reaction` whenever `trigger` is seen.
    #[must_use]
    pub fn new(trigger: Event<P>, reaction: Event<P>) -> Self {
        Self {
            trigger,
            reaction,
            repeat: Repeat::Forever,
            budget: Arc::new(Mutex::new(Some(Repeat::Forever))),
            binding: None,
        }
    }

    /// Bounds how many reactions one arming produces.
    #[must_use]
    pub fn with_repeat(mut self, repeat: impl Into<Repeat>) -> Self {
        self.repeat = repeat.into();
        *self.budget.lock() = Some(self.repeat);
        self
    }

    /// The event being listened for.
    #[must_use]
    pub fn trigger(&self) -> &Event<P> {
        &self.trigger
    }

    /// The event emitted in response.
    #[must_use]
    pub fn reaction(&self) -> &Event<P> {
        &self.reaction
    }

    /// Returns `true` while the effect is bound and has reactions left.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.binding.is_some() && self.budget.lock().is_some()
    }

    fn unbind(&mut self) {
        if let Some((registry, id)) = self.binding.take() {
            if let Some(registry) = registry.upgrade() {
                registry.unregister(id);
            }
        }
    }
}

impl<P: Payload> Effect<P> for TriggeredEffect<P> {
    fn init(&mut self, context: &EffectContext<'_, P>) {
        self.unbind();

        let mailbox: Arc<Mailbox<Event<P>>> = Arc::clone(context.mailbox());
        let budget = Arc::clone(&self.budget);
        let reaction = self.reaction.clone();
        let listener = MaskedListener::new(self.trigger.clone(), move |trigger: &Event<P>| {
            let mut budget = budget.lock();
            let Some(repeat) = budget.as_mut() else {
                return false;
            };
            debug!(trigger = ?trigger, reaction = ?reaction, "triggered effect fired");
            mailbox.send(reaction.clone());
            if !repeat.advance() {
                *budget = None;
            }
            true
        });

        let id = context.register_listener(Arc::new(listener));
        self.binding = Some((Arc::downgrade(context.listeners()), id));
    }

    fn start(&mut self) {
        if self.binding.is_none() {
            debug!(trigger = ?self.trigger, "triggered effect started before init; ignored");
            return;
        }
        *self.budget.lock() = Some(self.repeat);
    }

    /// Nothing to disarm: the trigger is only broadcast while the sequencer
    /// runs, so a stopped sequencer never reaches the listener.
    fn stop(&mut self) {}
}

impl<P: Payload> Drop for TriggeredEffect<P> {
    fn drop(&mut self) {
        self.unbind();
    }
}
