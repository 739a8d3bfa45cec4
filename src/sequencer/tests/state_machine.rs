/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Transition-table tests, driving the processor directly on the test thread.

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectContext};
    use crate::listener::{FnListener, ListenerRegistry};
    use crate::mailbox::Mailbox;
    use crate::sequencer::processor::{EffectList, Processor};
    use crate::{Control, Event};
    use parking_lot::Mutex as PlMutex;
    use std::ops::ControlFlow;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};
    use tokio::sync::watch;

    type Log = Arc<Mutex<Vec<String>>>;

    struct ProbeEffect {
        log: Log,
    }

    impl Effect for ProbeEffect {
        fn init(&mut self, _context: &EffectContext<'_>) {}

        fn start(&mut self) {
            self.log.lock().unwrap().push("effect:start".to_string());
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().push("effect:stop".to_string());
        }

        fn suspend(&mut self) {
            self.log.lock().unwrap().push("effect:suspend".to_string());
        }

        fn resume(&mut self) {
            self.log.lock().unwrap().push("effect:resume".to_string());
        }
    }

    struct Harness {
        processor: Processor<String>,
        state_rx: watch::Receiver<Control>,
        log: Log,
    }

    impl Harness {
        fn new() -> Self {
            let log: Log = Arc::new(Mutex::new(Vec::new()));
            let listeners = Arc::new(ListenerRegistry::new());
            for name in ["first", "second"] {
                let log = Arc::clone(&log);
                listeners.register(Arc::new(FnListener::new(move |event: &Event| {
                    log.lock().unwrap().push(format!("{name}:{event}"));
                    true
                })));
            }

            let effects: EffectList<String> = Arc::new(PlMutex::new(Vec::new()));
            effects.lock().push(Box::new(ProbeEffect {
                log: Arc::clone(&log),
            }));

            let (state_tx, state_rx) = watch::channel(Control::Idle);
            let processor = Processor {
                name: "state-machine".to_string(),
                state: Control::Idle,
                mailbox: Arc::new(Mailbox::new()),
                listeners,
                effects,
                state_tx,
                halted: Arc::new(AtomicBool::new(false)),
            };

            Self {
                processor,
                state_rx,
                log,
            }
        }

        fn feed(&mut self, event: Event) -> ControlFlow<()> {
            self.processor.process(event)
        }

        fn control(&mut self, signal: Control) -> ControlFlow<()> {
            self.feed(Event::control(signal))
        }

        fn state(&self) -> Control {
            assert_eq!(*self.state_rx.borrow(), self.processor.state);
            self.processor.state
        }

        fn take_log(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.lock().unwrap())
        }
    }

    #[test]
    fn test_start_then_stopped_broadcasts_one_stopped_in_order() {
        let mut harness = Harness::new();

        harness.control(Control::Start);
        assert_eq!(harness.state(), Control::Running);
        assert_eq!(harness.take_log(), vec!["effect:start"]);

        harness.control(Control::Stopped);
        assert_eq!(harness.state(), Control::Idle);
        assert_eq!(
            harness.take_log(),
            vec!["effect:stop", "first:STOPPED", "second:STOPPED"]
        );
    }

    #[test]
    fn test_data_events_only_broadcast_while_running() {
        let mut harness = Harness::new();

        harness.feed(Event::message("early"));
        assert!(harness.take_log().is_empty());

        harness.control(Control::Start);
        harness.take_log();
        harness.feed(Event::message("on-time"));
        assert_eq!(harness.take_log(), vec!["first:on-time", "second:on-time"]);

        harness.control(Control::Stopped);
        harness.take_log();
        harness.feed(Event::message("late"));
        assert!(harness.take_log().is_empty());
    }

    #[test]
    fn test_suspend_only_from_running() {
        let mut harness = Harness::new();

        harness.control(Control::Suspend);
        assert_eq!(harness.state(), Control::Idle);
        assert!(harness.take_log().is_empty());

        harness.control(Control::Start);
        harness.take_log();
        harness.control(Control::Suspend);
        assert_eq!(harness.state(), Control::Idle);
        assert_eq!(harness.take_log(), vec!["effect:suspend"]);

        // Suspended: data is dropped.
        harness.feed(Event::message("while-suspended"));
        assert!(harness.take_log().is_empty());
    }

    #[test]
    fn test_resume_only_from_idle() {
        let mut harness = Harness::new();

        harness.control(Control::Resume);
        assert_eq!(harness.state(), Control::Running);
        assert_eq!(harness.take_log(), vec!["effect:resume"]);

        // Already running: RESUME has no transition and is broadcast like data.
        harness.control(Control::Resume);
        assert_eq!(harness.state(), Control::Running);
        assert_eq!(harness.take_log(), vec!["first:RESUME", "second:RESUME"]);
    }

    #[test]
    fn test_stopped_from_idle_still_stops_and_broadcasts() {
        let mut harness = Harness::new();

        harness.control(Control::Stopped);
        assert_eq!(harness.state(), Control::Idle);
        assert_eq!(
            harness.take_log(),
            vec!["effect:stop", "first:STOPPED", "second:STOPPED"]
        );
    }

    #[test]
    fn test_terminate_stops_and_exits() {
        let mut harness = Harness::new();
        harness.control(Control::Start);
        harness.take_log();

        assert_eq!(harness.control(Control::Terminate), ControlFlow::Break(()));
        assert_eq!(harness.state(), Control::Idle);
        assert_eq!(
            harness.take_log(),
            vec!["effect:stop", "first:STOPPED", "second:STOPPED"]
        );
    }

    #[test]
    fn test_start_while_running_restarts_effects() {
        let mut harness = Harness::new();
        harness.control(Control::Start);
        harness.control(Control::Start);

        assert_eq!(harness.state(), Control::Running);
        assert_eq!(harness.take_log(), vec!["effect:start", "effect:start"]);
    }

    #[test]
    fn test_state_values_without_transition() {
        let mut harness = Harness::new();

        for signal in [Control::Idle, Control::Running] {
            assert_eq!(harness.control(signal), ControlFlow::Continue(()));
        }
        assert_eq!(harness.state(), Control::Idle);
        assert!(harness.take_log().is_empty());

        harness.control(Control::Start);
        harness.take_log();
        harness.control(Control::Idle);
        assert_eq!(harness.state(), Control::Running);
        assert_eq!(harness.take_log(), vec!["first:IDLE", "second:IDLE"]);
    }
}
