/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! The processing thread: the only place sequencer state changes.

use crate::effect::Effect;
use crate::event::{Control, Event, Payload};
use crate::listener::ListenerRegistry;
use crate::mailbox::Mailbox;
use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info_span, trace};

/// Effects shared between the owning [`Sequencer`](super::Sequencer) and the
/// processing thread.
pub(crate) type EffectList<P> = Arc<Mutex<Vec<Box<dyn Effect<P>>>>>;

/// State machine run by the processing thread.
///
/// `state` is owned here and nowhere else; the outside world only sees the
/// copies published through `state_tx`.
pub(crate) struct Processor<P: Payload> {
    pub(crate) name: String,
    pub(crate) state: Control,
    pub(crate) mailbox: Arc<Mailbox<Event<P>>>,
    pub(crate) listeners: Arc<ListenerRegistry<P>>,
    pub(crate) effects: EffectList<P>,
    pub(crate) state_tx: watch::Sender<Control>,
    /// Set by the owner right before it cancels the mailbox wait.
    pub(crate) halted: Arc<AtomicBool>,
}

impl<P: Payload> Processor<P> {
    /// Runs until TERMINATE is processed or the owner shuts the sequencer down.
    pub(crate) fn run(mut self) {
        let span = info_span!("sequencer", name = %self.name);
        let _entered = span.enter();
        debug!("processing thread started");

        loop {
            let next = if self.halted.load(Ordering::Acquire) {
                None
            } else {
                self.mailbox.wait()
            };
            let Some(first) = next else {
                // Cancelled: whatever is already queued (normally the final
                // STOPPED) is still processed before exiting.
                self.drain();
                break;
            };
            if self.process_burst(first).is_break() {
                break;
            }
        }

        self.state_tx.send_replace(Control::Stopped);
        debug!("processing thread exiting");
    }

    /// Processes `first` and everything immediately available after it.
    fn process_burst(&mut self, first: Event<P>) -> ControlFlow<()> {
        let mut next = Some(first);
        while let Some(event) = next {
            if self.process(event).is_break() {
                return ControlFlow::Break(());
            }
            next = self.mailbox.poll();
        }
        ControlFlow::Continue(())
    }

    fn drain(&mut self) {
        while let Some(event) = self.mailbox.poll() {
            if self.process(event).is_break() {
                break;
            }
        }
    }

    pub(crate) fn process(&mut self, event: Event<P>) -> ControlFlow<()> {
        trace!(event = ?event, state = %self.state, "received");
        match event.as_control() {
            Some(signal) => self.apply(signal, &event),
            None if self.state == Control::Running => {
                self.broadcast(&event);
                ControlFlow::Continue(())
            }
            None => {
                trace!(event = ?event, state = %self.state, "not running; event dropped");
                ControlFlow::Continue(())
            }
        }
    }

    /// Applies at most one transition for a control event.
    fn apply(&mut self, signal: Control, event: &Event<P>) -> ControlFlow<()> {
        match (self.state, signal) {
            (_, Control::Start) => {
                self.on_start();
                self.transition(Control::Running);
            }
            (Control::Running, Control::Suspend) => {
                self.on_suspend();
                self.transition(Control::Idle);
            }
            (Control::Idle, Control::Resume) => {
                self.on_resume();
                self.transition(Control::Running);
            }
            (_, Control::Stopped) => {
                self.on_stop();
                self.transition(Control::Idle);
            }
            (_, Control::Terminate) => {
                self.on_stop();
                self.transition(Control::Idle);
                return ControlFlow::Break(());
            }
            // Control values without a transition are ordinary events while running.
            (Control::Running, _) => self.broadcast(event),
            (state, signal) => {
                trace!(%state, %signal, "control event ignored");
            }
        }
        ControlFlow::Continue(())
    }

    fn transition(&mut self, next: Control) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "state transition");
        }
        self.state = next;
        self.state_tx.send_replace(next);
    }

    fn on_start(&mut self) {
        for effect in self.effects.lock().iter_mut() {
            effect.start();
        }
    }

    fn on_suspend(&mut self) {
        for effect in self.effects.lock().iter_mut() {
            effect.suspend();
        }
    }

    fn on_resume(&mut self) {
        for effect in self.effects.lock().iter_mut() {
            effect.resume();
        }
    }

    fn on_stop(&mut self) {
        for effect in self.effects.lock().iter_mut() {
            effect.stop();
        }
        self.broadcast(&Event::control(Control::Stopped));
    }

    fn broadcast(&self, event: &Event<P>) {
        let handled = self.listeners.broadcast(event);
        trace!(event = ?event, handled, "broadcast");
    }
}
