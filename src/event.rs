/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Event types flowing through the sequencer.
//!
//! Every value that travels through a [`Mailbox`](crate::Mailbox) is an
//! [`Event`]: either a [`Control`] signal driving the sequencer's state
//! machine, or an application payload that is broadcast to listeners while
//! the sequencer is running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marker trait for application payloads carried by [`Event::Message`].
///
/// Payloads only need value equality (used by masks and masked listeners),
/// cheap cloning, and the ability to cross thread boundaries.
pub trait Payload: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

// Blanket impl: any type with the right bounds is a payload.
impl<T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static> Payload for T {}

/// Control signals understood by the sequencer state machine.
///
/// The same vocabulary doubles as the set of sequencer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Control {
    /// Not running; data events are dropped.
    Idle,
    /// Request to arm every effect and enter [`Control::Running`].
    Start,
    /// Broadcasting every dequeued event.
    Running,
    /// Stop every effect, then end the processing thread.
    Terminate,
    /// Stop every effect and return to [`Control::Idle`].
    Stopped,
    /// Leave [`Control::Running`] without stopping effects.
    Suspend,
    /// Return from a suspension back to [`Control::Running`].
    Resume,
}

impl Control {
    /// All control values, in declaration order.
    pub const ALL: [Control; 7] = [
        Control::Idle,
        Control::Start,
        Control::Running,
        Control::Terminate,
        Control::Stopped,
        Control::Suspend,
        Control::Resume,
    ];

    /// Returns the diagnostic name of the signal (`"IDLE"`, `"START"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Control::Idle => "IDLE",
            Control::Start => "START",
            Control::Running => "RUNNING",
            Control::Terminate => "TERMINATE",
            Control::Stopped => "STOPPED",
            Control::Suspend => "SUSPEND",
            Control::Resume => "RESUME",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown control name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control signal `{0}`")]
pub struct ParseControlError(pub String);

impl FromStr for Control {
    type Err = ParseControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.as_str() == s)
            .ok_or_else(|| ParseControlError(s.to_string()))
    }
}

/// A value carried by the mailbox: a control signal or a domain payload.
///
/// Equality compares the variant first and then its content, so a control
/// signal never equals a message, even one whose text reads the same.
///
/// # Examples
///
/// ```
/// use effect_sequencer::{Control, Event};
///
/// let stop: Event = Event::control(Control::Stopped);
/// assert!(stop.is_control(Control::Stopped));
/// assert_ne!(stop, Event::message("STOPPED".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event<P = String> {
    /// A sequencer control signal.
    Control(Control),
    /// An application payload.
    Message(P),
}

impl<P> Event<P> {
    /// Creates a control event.
    #[must_use]
    pub const fn control(signal: Control) -> Self {
        Event::Control(signal)
    }

    /// Creates a message event.
    #[must_use]
    pub fn message(payload: impl Into<P>) -> Self {
        Event::Message(payload.into())
    }

    /// Returns the control signal, if this is a control event.
    #[must_use]
    pub fn as_control(&self) -> Option<Control> {
        match self {
            Event::Control(signal) => Some(*signal),
            Event::Message(_) => None,
        }
    }

    /// Returns the payload, if this is a message event.
    #[must_use]
    pub fn payload(&self) -> Option<&P> {
        match self {
            Event::Control(_) => None,
            Event::Message(payload) => Some(payload),
        }
    }

    /// Returns `true` if this is the given control signal.
    #[inline]
    #[must_use]
    pub fn is_control(&self, signal: Control) -> bool {
        matches!(self, Event::Control(s) if *s == signal)
    }
}

impl<P> From<Control> for Event<P> {
    fn from(signal: Control) -> Self {
        Event::Control(signal)
    }
}

impl<P: fmt::Display> fmt::Display for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Control(signal) => fmt::Display::fmt(signal, f),
            Event::Message(payload) => fmt::Display::fmt(payload, f),
        }
    }
}
