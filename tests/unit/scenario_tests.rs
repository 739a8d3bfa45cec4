/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/
use effect_sequencer::{
    Control, Event, EventWaiter, Sequencer, SequencerConfig, TimedEffect, TriggeredEffect,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequencer: &Sequencer<&'static str>) -> Arc<Mutex<Vec<Event<&'static str>>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        sequencer.add_listener(move |event| log_clone.lock().unwrap().push(*event));
        log
    }

    fn occurrences(log: &Mutex<Vec<Event<&'static str>>>, event: Event<&'static str>) -> usize {
        log.lock().unwrap().iter().filter(|e| **e == event).count()
    }

    fn wait_terminated(sequencer: &Sequencer<&'static str>, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !sequencer.is_terminated() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        sequencer.is_terminated()
    }

    // --- The scripted show ---

    #[test]
    fn test_scripted_show_runs_to_completion() {
        let sequencer: Sequencer<&'static str> =
            Sequencer::with_config(SequencerConfig::new("show")).unwrap();
        let middle = Event::Message("Middle!");

        sequencer.add(TimedEffect::new(
            Duration::from_millis(200),
            Event::Message("TwoHundred"),
            5,
        ));
        sequencer.add(TimedEffect::once(Duration::from_millis(500), middle));
        sequencer.add(TimedEffect::once(
            Duration::from_millis(1100),
            Event::control(Control::Terminate),
        ));
        sequencer.add(TriggeredEffect::new(middle, Event::Message("Reaction")));

        // Listeners run in registration order: the recorder sees STOPPED
        // before the waiter releases this thread.
        let log = record(&sequencer);
        let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
        sequencer.register_listener(stopped.clone());

        sequencer.start();
        assert!(stopped.wait_event_timeout(Duration::from_secs(5)));
        assert!(wait_terminated(&sequencer, Duration::from_secs(2)));

        assert_eq!(occurrences(&log, Event::Message("TwoHundred")), 5);
        assert_eq!(occurrences(&log, middle), 1);
        assert_eq!(occurrences(&log, Event::Message("Reaction")), 1);
        assert_eq!(occurrences(&log, Event::control(Control::Stopped)), 1);

        // TERMINATE is consumed by the state machine, never broadcast.
        assert_eq!(occurrences(&log, Event::control(Control::Terminate)), 0);
        assert_eq!(log.lock().unwrap().last(), Some(&Event::control(Control::Stopped)));
    }

    #[test]
    fn test_three_shots_then_terminate() {
        let sequencer: Sequencer<&'static str> = Sequencer::new().unwrap();
        sequencer.add(TimedEffect::new(Duration::from_millis(200), Event::Message("A"), 3));
        let log = record(&sequencer);

        let started = Instant::now();
        sequencer.start();
        while occurrences(&log, Event::Message("A")) < 3
            && started.elapsed() < Duration::from_millis(800)
        {
            std::thread::sleep(Duration::from_millis(2));
        }
        let third_shot = started.elapsed();
        assert_eq!(occurrences(&log, Event::Message("A")), 3);
        assert!(third_shot >= Duration::from_millis(600), "{third_shot:?}");
        assert!(third_shot < Duration::from_millis(800), "{third_shot:?}");

        let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
        sequencer.register_listener(stopped.clone());
        sequencer.terminate();
        assert!(stopped.wait_event_timeout(Duration::from_secs(2)));
        assert!(wait_terminated(&sequencer, Duration::from_secs(2)));
        assert_eq!(occurrences(&log, Event::Message("A")), 3);
        assert_eq!(occurrences(&log, Event::control(Control::Stopped)), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let sequencer: Sequencer<&'static str> = Sequencer::new().unwrap();
        sequencer.add(TimedEffect::new(Duration::from_millis(20), Event::Message("beat"), 2));
        let log = record(&sequencer);

        let stopped = Arc::new(EventWaiter::new(Event::control(Control::Stopped)));
        sequencer.register_listener(stopped.clone());

        for round in 1..=2 {
            sequencer.start();
            std::thread::sleep(Duration::from_millis(200));
            sequencer.stop();
            assert!(stopped.wait_event_timeout(Duration::from_secs(1)));
            assert_eq!(occurrences(&log, Event::Message("beat")), 2 * round);
        }
    }
}
