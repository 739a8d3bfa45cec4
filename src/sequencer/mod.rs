/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Sequencer module: one state machine serializing a timeline of effects.
//!
//! This module provides the [`Sequencer`], which owns a mailbox, a dedicated
//! processing thread running the state machine, a timer thread, the effects
//! and a registry of listeners.
//!
//! # Architecture
//!
//! - Callers and effects enqueue events into the sequencer's [`Mailbox`]
//! - A single processing thread dequeues them, draining bursts without
//!   blocking, and applies the control transitions
//! - While RUNNING every dequeued event is broadcast, synchronously and in
//!   registration order, to the registered listeners
//! - Timed effects fire on the timer thread, triggered effects from inside a
//!   broadcast; both emit back into the same mailbox
//!
//! # State machine
//!
//! | Current | Incoming  | Next    | Action                                   |
//! |---------|-----------|---------|------------------------------------------|
//! | any     | START     | RUNNING | start every effect                       |
//! | RUNNING | SUSPEND   | IDLE    | suspend hook                             |
//! | IDLE    | RESUME    | RUNNING | resume hook                              |
//! | any     | STOPPED   | IDLE    | stop every effect, broadcast one STOPPED |
//! | any     | TERMINATE | exit    | as STOPPED, then the thread ends         |
//! | RUNNING | other     | RUNNING | broadcast                                |
//!
//! # Examples
//!
//! ```no_run
//! use effect_sequencer::{Control, Event, EventWaiter, Sequencer, SequencerConfig, TimedEffect};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sequencer: Sequencer = Sequencer::with_config(SequencerConfig::new("show"))?;
//! sequencer.add(TimedEffect::new(Duration::from_millis(200), Event::message("A"), 3));
//! sequencer.add(TimedEffect::once(Duration::from_millis(1000), Event::control(Control::Terminate)));
//!
//! let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
//! sequencer.register_listener(stopped.clone());
//! sequencer.start();
//! stopped.wait_event();
//! # Ok(())
//! # }
//! ```
//!
//! [`Mailbox`]: crate::Mailbox

pub mod config;
pub mod core;
pub mod error;
mod processor;

#[cfg(test)]
mod tests;

// Re-export main types
pub use config::SequencerConfig;
pub use self::core::Sequencer;
pub use error::SequencerError;
