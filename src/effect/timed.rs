/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Effect that emits an event after a fixed duration.

use super::{Effect, EffectContext, Repeat};
use crate::event::{Event, Payload};
use crate::mailbox::Mailbox;
use crate::timer::Timer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Emits `event` into the sequencer's mailbox every `period`, as many times
/// as its [`Repeat`] policy allows.
///
/// The repeat count restarts from the configured policy on every `start`.
/// Expiry callbacks run on the sequencer's timer thread.
pub struct TimedEffect<P: Payload = String> {
    period: Duration,
    event: Event<P>,
    repeat: Repeat,
    mailbox: Option<Arc<Mailbox<Event<P>>>>,
    timer: Option<Timer>,
}

impl<P: Payload> TimedEffect<P> {
    /// Creates a detached timed effect.
    #[must_use]
    pub fn new(period: Duration, event: Event<P>, repeat: impl Into<Repeat>) -> Self {
        Self {
            period,
            event,
            repeat: repeat.into(),
            mailbox: None,
            timer: None,
        }
    }

    /// Creates a single-shot timed effect.
    #[must_use]
    pub fn once(period: Duration, event: Event<P>) -> Self {
        Self::new(period, event, Repeat::Once)
    }

    /// Time between arming and each shot.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The event emitted on every shot.
    #[must_use]
    pub fn event(&self) -> &Event<P> {
        &self.event
    }

    /// The configured repeat policy.
    #[must_use]
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Returns `true` while a shot is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::is_armed)
    }
}

impl<P: Payload> Effect<P> for TimedEffect<P> {
    fn init(&mut self, context: &EffectContext<'_, P>) {
        self.stop();
        self.mailbox = Some(Arc::clone(context.mailbox()));
        self.timer = context.create_timer();
        if self.timer.is_none() {
            warn!(event = ?self.event, "timer service unavailable; timed effect stays inert");
        }
    }

    fn start(&mut self) {
        let (Some(timer), Some(mailbox)) = (&self.timer, &self.mailbox) else {
            debug!(event = ?self.event, "timed effect started before init; ignored");
            return;
        };

        let mailbox = Arc::clone(mailbox);
        let event = self.event.clone();
        let mut repeat = self.repeat;
        timer.start(self.period, move || {
            debug!(event = ?event, remaining = ?repeat.remaining(), "timed effect fired");
            mailbox.send(event.clone());
            repeat.advance()
        });
    }

    fn stop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}

impl<P: Payload> Drop for TimedEffect<P> {
    fn drop(&mut self) {
        self.stop();
    }
}
