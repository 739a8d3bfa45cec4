/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Core Sequencer implementation.
//!
//! This module provides the [`Sequencer`]: the owner of the mailbox, the
//! processing thread, the timer thread, the effects and the listener
//! registry, and the only way callers interact with them.

use super::config::SequencerConfig;
use super::error::SequencerError;
use super::processor::{EffectList, Processor};
use crate::effect::{Effect, EffectContext};
use crate::event::{Control, Event, Payload};
use crate::listener::{FnListener, ListenerId, ListenerRegistry, MaskedListener, SharedListener};
use crate::mailbox::Mailbox;
use crate::timer::{Timer, TimerService};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tokio::sync::watch;
use tracing::{debug, error};

/// Coordinator of a timeline of timed and event-triggered effects.
///
/// All state transitions and broadcasts happen on a single processing
/// thread, fed through the sequencer's [`Mailbox`]. Callers drive it by
/// sending control events ([`start`](Self::start), [`stop`](Self::stop),
/// [`terminate`](Self::terminate)); effects feed events back into the same
/// mailbox from the timer thread or from listener callbacks.
///
/// Dropping the sequencer (or calling [`shutdown`](Self::shutdown)) stops
/// every effect, broadcasts a final STOPPED and joins both worker threads.
///
/// # Examples
///
/// ```no_run
/// use effect_sequencer::{Control, Event, Sequencer, TimedEffect};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sequencer: Sequencer = Sequencer::new()?;
/// sequencer.add(TimedEffect::new(Duration::from_millis(200), Event::message("A"), 3));
/// sequencer.add_listener(|event| println!("observed {event}"));
/// sequencer.start();
/// # Ok(())
/// # }
/// ```
pub struct Sequencer<P: Payload = String> {
    name: String,
    mailbox: Arc<Mailbox<Event<P>>>,
    listeners: Arc<ListenerRegistry<P>>,
    effects: EffectList<P>,
    timers: TimerService,
    state_rx: watch::Receiver<Control>,
    halted: Arc<AtomicBool>,
    processor: Option<thread::JoinHandle<()>>,
}

impl<P: Payload> Sequencer<P> {
    /// Creates a sequencer with the default configuration and spawns its
    /// worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError`] if a worker thread cannot be started.
    pub fn new() -> Result<Self, SequencerError> {
        Self::with_config(SequencerConfig::default())
    }

    /// Creates a sequencer from `config` and spawns its worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::InvalidConfig`] for an unusable configuration
    /// and [`SequencerError::Spawn`] / [`SequencerError::TimerRuntime`] if a
    /// worker thread cannot be started.
    pub fn with_config(config: SequencerConfig) -> Result<Self, SequencerError> {
        Self::with_mailbox(config, Arc::new(Mailbox::new()))
    }

    /// Like [`with_config`](Self::with_config), but processes events from an
    /// existing mailbox.
    ///
    /// # Errors
    ///
    /// See [`with_config`](Self::with_config).
    pub fn with_mailbox(
        config: SequencerConfig,
        mailbox: Arc<Mailbox<Event<P>>>,
    ) -> Result<Self, SequencerError> {
        config.validate()?;
        let SequencerConfig { name } = config;

        let timers = TimerService::spawn(&name)?;
        let listeners = Arc::new(ListenerRegistry::new());
        let effects: EffectList<P> = Arc::new(Mutex::new(Vec::new()));
        let halted = Arc::new(AtomicBool::new(false));
        let (state_tx, state_rx) = watch::channel(Control::Idle);

        let processor = Processor {
            name: name.clone(),
            state: Control::Idle,
            mailbox: Arc::clone(&mailbox),
            listeners: Arc::clone(&listeners),
            effects: Arc::clone(&effects),
            state_tx,
            halted: Arc::clone(&halted),
        };
        let thread_name = format!("{name}-processor");
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || processor.run())
            .map_err(|source| SequencerError::Spawn {
                thread: thread_name,
                source,
            })?;

        Ok(Self {
            name,
            mailbox,
            listeners,
            effects,
            timers,
            state_rx,
            halted,
            processor: Some(handle),
        })
    }

    /// The configured name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `effect` to this sequencer and adds it to the timeline.
    ///
    /// Effects are armed on the next START, so add them before starting.
    pub fn add<E>(&self, mut effect: E)
    where
        E: Effect<P> + 'static,
    {
        effect.init(&EffectContext::new(
            &self.mailbox,
            &self.listeners,
            &self.timers,
        ));
        self.effects.lock().push(Box::new(effect));
    }

    /// Returns the number of effects on the timeline.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.effects.lock().len()
    }

    /// Stops and drops every effect.
    pub fn clear_effects(&self) {
        let removed: Vec<Box<dyn Effect<P>>> = self.effects.lock().drain(..).collect();
        for mut effect in removed {
            effect.stop();
        }
    }

    /// Requests a transition to RUNNING, arming every effect.
    pub fn start(&self) {
        self.send(Event::control(Control::Start));
    }

    /// Requests a transition to IDLE, stopping every effect.
    pub fn stop(&self) {
        self.send(Event::control(Control::Stopped));
    }

    /// Stops every effect and ends the processing thread.
    pub fn terminate(&self) {
        self.send(Event::control(Control::Terminate));
    }

    /// Requests RUNNING → IDLE without stopping effects.
    pub fn suspend(&self) {
        self.send(Event::control(Control::Suspend));
    }

    /// Requests IDLE → RUNNING without re-arming effects.
    pub fn resume(&self) {
        self.send(Event::control(Control::Resume));
    }

    /// Enqueues `event` for the processing thread.
    pub fn send(&self, event: Event<P>) {
        self.mailbox.send(event);
    }

    /// Registers a listener invoked for every broadcast event.
    pub fn register_listener(&self, listener: SharedListener<P>) -> ListenerId {
        self.listeners.register(listener)
    }

    /// Registers a closure invoked for every broadcast event.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Event<P>) + Send + Sync + 'static,
    {
        self.register_listener(Arc::new(FnListener::new(move |event: &Event<P>| {
            listener(event);
            true
        })))
    }

    /// Registers a closure invoked only for broadcast events equal to `mask`.
    pub fn add_masked_listener<F>(&self, mask: Event<P>, listener: F) -> ListenerId
    where
        F: Fn(&Event<P>) + Send + Sync + 'static,
    {
        self.register_listener(Arc::new(MaskedListener::new(
            mask,
            move |event: &Event<P>| {
                listener(event);
                true
            },
        )))
    }

    /// Removes a listener. Returns `false` if `id` is not registered.
    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Returns the number of registered listeners, effects' own included.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Allocates a timer on this sequencer's timer thread.
    ///
    /// Returns `None` once the sequencer has been shut down.
    #[must_use]
    pub fn create_timer(&self) -> Option<Timer> {
        self.timers.create_timer()
    }

    /// The mailbox feeding the processing thread.
    #[must_use]
    pub fn mailbox(&self) -> Arc<Mailbox<Event<P>>> {
        Arc::clone(&self.mailbox)
    }

    /// The state most recently published by the processing thread.
    ///
    /// STOPPED once the processing thread has exited.
    #[must_use]
    pub fn state(&self) -> Control {
        *self.state_rx.borrow()
    }

    /// Returns a receiver notified on every published state.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<Control> {
        self.state_rx.clone()
    }

    /// Returns `true` once the processing thread has exited.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.processor
            .as_ref()
            .is_none_or(thread::JoinHandle::is_finished)
    }

    /// Shuts the sequencer down and joins its worker threads.
    pub fn shutdown(mut self) {
        self.shutdown_in_place();
    }

    /// Shutdown order matters: the final STOPPED must be queued before the
    /// timer thread goes away, and no timer may fire into the mailbox once
    /// the processing thread is cancelled.
    fn shutdown_in_place(&mut self) {
        let Some(processor) = self.processor.take() else {
            return;
        };
        debug!(name = %self.name, "shutting down");

        self.mailbox.send(Event::control(Control::Stopped));

        self.timers.shutdown();

        self.halted.store(true, Ordering::Release);
        self.mailbox.cancel_wait();
        if processor.join().is_err() {
            error!(name = %self.name, "processing thread panicked");
        }

        self.listeners.clear();
        debug!(name = %self.name, "shut down");
    }
}

impl<P: Payload> Drop for Sequencer<P> {
    fn drop(&mut self) {
        self.shutdown_in_place();
    }
}
