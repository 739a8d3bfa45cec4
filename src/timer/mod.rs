/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Timer subsystem driving effect expiry callbacks.
//!
//! Each sequencer owns one [`TimerService`]: a dedicated thread running a
//! current-thread `tokio` runtime. Timers created from it schedule their
//! callbacks as tasks on that runtime, so every expiry callback executes on
//! the timer thread, never on the sequencer's processing thread.
//!
//! A [`Timer`] keeps a generation counter next to its pending task. Firing
//! happens with the timer's lock held and only if the generation is still
//! current, so once [`Timer::cancel`] returns no callback is running and
//! none can run later.

use crate::sequencer::SequencerError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

#[cfg(test)]
mod tests;

/// Owner of the timer thread.
///
/// Dropping the service (or calling [`shutdown`](Self::shutdown)) stops the
/// runtime and joins the thread; pending timers are discarded without
/// firing.
pub struct TimerService {
    name: String,
    runtime: Handle,
    alive: Arc<AtomicBool>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TimerService {
    /// Spawns the timer thread, named `"{name}-timer"`.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::TimerRuntime`] if the runtime cannot be
    /// built and [`SequencerError::Spawn`] if the thread cannot be started.
    pub fn spawn(name: &str) -> Result<Self, SequencerError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(SequencerError::TimerRuntime)?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread_name = format!("{name}-timer");
        let thread = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                runtime.block_on(async {
                    // Either an explicit shutdown or the sender being dropped.
                    let _ = shutdown_rx.await;
                });
                // Dropping the runtime cancels every pending timer task.
                drop(runtime);
            })
            .map_err(|source| SequencerError::Spawn {
                thread: thread_name,
                source,
            })?;

        debug!(service = name, "timer thread started");
        Ok(Self {
            name: name.to_string(),
            runtime: handle,
            alive: Arc::new(AtomicBool::new(true)),
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Creates a new, unarmed timer bound to this service.
    ///
    /// Returns `None` once the service has been shut down.
    #[must_use]
    pub fn create_timer(&self) -> Option<Timer> {
        if !self.is_running() {
            return None;
        }
        Some(Timer {
            runtime: self.runtime.clone(),
            alive: Arc::clone(&self.alive),
            slot: Arc::new(Mutex::new(TimerSlot {
                generation: 0,
                task: None,
            })),
        })
    }

    /// Returns `true` until the service has been shut down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stops the runtime and joins the timer thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.alive.store(false, Ordering::Release);
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(service = %self.name, "timer thread panicked");
            } else {
                debug!(service = %self.name, "timer thread joined");
            }
        }
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct TimerSlot {
    /// Bumped on every start and cancel; a task only fires for its own value.
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// A re-armable, cancellable timer running on a [`TimerService`].
///
/// Dropping the timer cancels it.
pub struct Timer {
    runtime: Handle,
    alive: Arc<AtomicBool>,
    slot: Arc<Mutex<TimerSlot>>,
}

impl Timer {
    /// Arms the timer, replacing any previous arming.
    ///
    /// `on_expiry` runs on the timer thread each time `period` elapses; it
    /// returns whether the timer should re-arm for another `period`.
    /// Returns `false` without arming if the timer service is gone.
    pub fn start<F>(&self, period: Duration, on_expiry: F) -> bool
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        if !self.alive.load(Ordering::Acquire) {
            return false;
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        slot.task = Some(
            self.runtime
                .spawn(run_timer(shared, generation, period, on_expiry)),
        );
        true
    }

    /// Disarms the timer.
    ///
    /// Waits for an in-flight callback to finish; after this returns the
    /// callback will not run again. Returns `true` if a pending arming was
    /// cancelled.
    pub fn cancel(&self) -> bool {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        match slot.task.take() {
            Some(task) => {
                let pending = !task.is_finished();
                task.abort();
                pending
            }
            None => false,
        }
    }

    /// Returns `true` while an arming is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_timer<F>(slot: Arc<Mutex<TimerSlot>>, generation: u64, period: Duration, mut on_expiry: F)
where
    F: FnMut() -> bool + Send + 'static,
{
    loop {
        tokio::time::sleep(period).await;
        if !fire(&slot, generation, &mut on_expiry) {
            break;
        }
    }
}

fn fire<F: FnMut() -> bool>(slot: &Mutex<TimerSlot>, generation: u64, on_expiry: &mut F) -> bool {
    let guard = slot.lock();
    if guard.generation != generation {
        trace!(generation, "stale timer expiry discarded");
        return false;
    }
    let rearm = on_expiry();
    drop(guard);
    rearm
}
