/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! # Effect Sequencer
//!
//! A threaded coordinator for a timeline of time- and event-triggered
//! effects: a scripted show of timed and reactive actions driven through one
//! authoritative state machine.
//!
//! ## Building blocks
//!
//! - [`Event`]: a [`Control`] signal or an application payload.
//! - [`Mailbox`]: thread-safe FIFO with blocking, non-blocking and masked
//!   retrieval plus explicit cancellation.
//! - [`Listener`]: synchronous callback for broadcast events; see
//!   [`FnListener`], [`MaskedListener`] and [`EventWaiter`].
//! - [`Effect`]: schedulable producer of events; see [`TimedEffect`] and
//!   [`TriggeredEffect`].
//! - [`Sequencer`]: owns the mailbox, the processing thread, the timer
//!   thread, the effects and the listener registry.
//!
//! ## Threads
//!
//! Each sequencer runs two threads: the processing thread, the only place
//! where state changes and broadcasts happen, and a timer thread on which
//! timed effects fire. Callers on any other thread send control events and
//! may block on their own [`EventWaiter`].
//!
//! ## Example
//!
//! ```no_run
//! use effect_sequencer::{Control, Event, EventWaiter, Sequencer, TimedEffect, TriggeredEffect};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sequencer: Sequencer = Sequencer::new()?;
//! let middle = Event::message("Middle!");
//!
//! sequencer.add(TimedEffect::new(Duration::from_millis(200), Event::message("tick"), 5));
//! sequencer.add(TimedEffect::once(Duration::from_millis(500), middle.clone()));
//! sequencer.add(TriggeredEffect::new(middle, Event::message("reaction")));
//! sequencer.add(TimedEffect::once(Duration::from_millis(1010), Event::control(Control::Terminate)));
//!
//! let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
//! sequencer.register_listener(stopped.clone());
//! sequencer.start();
//! stopped.wait_event();
//! # Ok(())
//! # }
//! ```

pub mod effect;
pub mod event;
pub mod listener;
pub mod mailbox;
pub mod sequencer;
pub mod timer;

pub use effect::{Effect, EffectContext, Repeat, TimedEffect, TriggeredEffect};
pub use event::{Control, Event, ParseControlError, Payload};
pub use listener::{
    EventWaiter, FnListener, Listener, ListenerId, ListenerRegistry, MaskedListener,
    SharedListener,
};
pub use mailbox::Mailbox;
pub use sequencer::{Sequencer, SequencerConfig, SequencerError};
pub use timer::{Timer, TimerService};
