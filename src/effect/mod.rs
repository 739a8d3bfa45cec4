/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Effects: schedulable producers of events.
//!
//! An [`Effect`] is bound to a sequencer once with [`Effect::init`], armed on
//! every transition into RUNNING with [`Effect::start`] and disarmed with
//! [`Effect::stop`]. Once armed it feeds events back into the sequencer's
//! mailbox on its own schedule:
//!
//! - [`TimedEffect`] fires after a fixed duration, optionally repeating.
//! - [`TriggeredEffect`] fires whenever a given event is broadcast.
//!
//! # Examples
//!
//! ```no_run
//! use effect_sequencer::{Event, Repeat, Sequencer, TimedEffect, TriggeredEffect};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sequencer: Sequencer = Sequencer::new()?;
//! sequencer.add(TimedEffect::new(Duration::from_millis(200), Event::message("tick"), Repeat::Times(5)));
//! sequencer.add(TriggeredEffect::new(Event::message("tick"), Event::message("tock")));
//! sequencer.start();
//! # Ok(())
//! # }
//! ```

pub mod repeat;
pub mod timed;
pub mod triggered;

#[cfg(test)]
mod tests;

pub use repeat::Repeat;
pub use timed::TimedEffect;
pub use triggered::TriggeredEffect;

use crate::event::{Event, Payload};
use crate::listener::{ListenerId, ListenerRegistry, SharedListener};
use crate::mailbox::Mailbox;
use crate::timer::{Timer, TimerService};
use std::sync::Arc;

/// Lifecycle capability shared by every effect.
///
/// `start` and `stop` are called by the sequencer's processing thread;
/// `stop` must additionally be safe to call from whichever thread drops the
/// effect and must be idempotent.
pub trait Effect<P: Payload = String>: Send {
    /// Binds the effect to a sequencer.
    fn init(&mut self, context: &EffectContext<'_, P>);

    /// Arms the effect. A no-op if `init` has not bound it yet.
    fn start(&mut self);

    /// Disarms whatever the effect scheduled itself. Nothing it scheduled
    /// fires once this returns.
    fn stop(&mut self);

    /// Called when the sequencer is suspended.
    fn suspend(&mut self) {}

    /// Called when the sequencer resumes from a suspension.
    fn resume(&mut self) {}
}

/// What an effect may bind to during [`Effect::init`].
pub struct EffectContext<'a, P: Payload = String> {
    mailbox: &'a Arc<Mailbox<Event<P>>>,
    listeners: &'a Arc<ListenerRegistry<P>>,
    timers: &'a TimerService,
}

impl<'a, P: Payload> EffectContext<'a, P> {
    /// Groups the sequencer resources an effect may bind to.
    #[must_use]
    pub fn new(
        mailbox: &'a Arc<Mailbox<Event<P>>>,
        listeners: &'a Arc<ListenerRegistry<P>>,
        timers: &'a TimerService,
    ) -> Self {
        Self {
            mailbox,
            listeners,
            timers,
        }
    }

    /// The mailbox effects emit into.
    #[must_use]
    pub fn mailbox(&self) -> &Arc<Mailbox<Event<P>>> {
        self.mailbox
    }

    /// The registry a reactive effect subscribes through.
    #[must_use]
    pub fn listeners(&self) -> &Arc<ListenerRegistry<P>> {
        self.listeners
    }

    /// Allocates a timer, or `None` if the timer thread is gone.
    #[must_use]
    pub fn create_timer(&self) -> Option<Timer> {
        self.timers.create_timer()
    }

    /// Registers `listener` with the sequencer.
    pub fn register_listener(&self, listener: SharedListener<P>) -> ListenerId {
        self.listeners.register(listener)
    }
}
