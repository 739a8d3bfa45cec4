/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! A scripted show.
//!
//! A 200 ms beat fires five times, a one-shot cue lands at 500 ms and sets
//! off a triggered reaction, and the show terminates itself at 1010 ms. The
//! main thread blocks until the final STOPPED is broadcast.
//!
//! Run with `RUST_LOG=debug cargo run -p effect-sequencer-demos --bin show`.

use effect_sequencer::{
    Control, Event, EventWaiter, Sequencer, SequencerConfig, SequencerError, TimedEffect,
    TriggeredEffect,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SequencerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    let sequencer: Sequencer = Sequencer::with_config(SequencerConfig::new("show"))?;
    let middle: Event = Event::message("Middle!");

    sequencer.add(TimedEffect::new(
        Duration::from_millis(200),
        Event::message("TwoHundred"),
        5,
    ));
    sequencer.add(TimedEffect::once(Duration::from_millis(500), middle.clone()));
    sequencer.add(TimedEffect::once(
        Duration::from_millis(1010),
        Event::control(Control::Terminate),
    ));
    sequencer.add(TriggeredEffect::new(middle, Event::message("Reaction")));

    let origin = Instant::now();
    sequencer.add_listener(move |event| {
        info!(elapsed_ms = origin.elapsed().as_millis() as u64, %event, "observed");
    });

    let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
    sequencer.register_listener(stopped.clone());

    info!(effects = sequencer.effect_count(), "starting show");
    sequencer.start();
    stopped.wait_event();
    info!(elapsed_ms = origin.elapsed().as_millis() as u64, "show finished");

    sequencer.shutdown();
    Ok(())
}
