/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/
use effect_sequencer::{Control, Event, ParseControlError, Repeat};

#[cfg(test)]
mod tests {
    use super::*;

    // --- Control vocabulary ---

    #[test]
    fn test_control_names() {
        let names: Vec<&str> = Control::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["IDLE", "START", "RUNNING", "TERMINATE", "STOPPED", "SUSPEND", "RESUME"]
        );
    }

    #[test]
    fn test_control_round_trips_through_display() {
        for control in Control::ALL {
            assert_eq!(control.to_string().parse::<Control>(), Ok(control));
        }
    }

    #[test]
    fn test_unknown_control_name() {
        assert_eq!(
            "PAUSE".parse::<Control>(),
            Err(ParseControlError("PAUSE".to_string()))
        );
        assert_eq!(
            "stopped".parse::<Control>().unwrap_err().to_string(),
            "unknown control signal `stopped`"
        );
    }

    #[test]
    fn test_control_serializes_as_vocabulary() {
        let json = serde_json::to_string(&Control::Terminate).unwrap();
        assert_eq!(json, "\"TERMINATE\"");
    }

    // --- Event equality ---

    #[test]
    fn test_event_equality_is_by_value() {
        let a: Event = Event::message("A");
        assert_eq!(a, Event::message("A".to_string()));
        assert_ne!(a, Event::message("B"));
        assert_eq!(
            Event::<String>::control(Control::Start),
            Event::from(Control::Start)
        );
    }

    #[test]
    fn test_control_never_equals_message() {
        let control: Event = Event::control(Control::Stopped);
        assert_ne!(control, Event::message("STOPPED"));
        assert_eq!(control.to_string(), Event::<String>::message("STOPPED").to_string());
    }

    #[test]
    fn test_event_accessors() {
        let control: Event = Event::control(Control::Resume);
        assert_eq!(control.as_control(), Some(Control::Resume));
        assert!(control.is_control(Control::Resume));
        assert!(!control.is_control(Control::Suspend));
        assert_eq!(control.payload(), None);

        let message: Event = Event::message("payload");
        assert_eq!(message.as_control(), None);
        assert_eq!(message.payload().map(String::as_str), Some("payload"));
    }

    // --- Repeat policy ---

    #[test]
    fn test_repeat_from_count() {
        assert_eq!(Repeat::from(-5), Repeat::Forever);
        assert_eq!(Repeat::from(0), Repeat::Once);
        assert_eq!(Repeat::from(1), Repeat::Once);
        assert_eq!(Repeat::from(4), Repeat::Times(4));
    }

    #[test]
    fn test_repeat_law() {
        for (policy, shots) in [(Repeat::Once, 1), (Repeat::Times(1), 1), (Repeat::Times(5), 5)] {
            let mut repeat = policy;
            let mut fired = 1;
            while repeat.advance() {
                fired += 1;
            }
            assert_eq!(fired, shots, "{policy:?}");
        }

        let mut forever = Repeat::Forever;
        assert!((0..1000).all(|_| forever.advance()));
        assert_eq!(forever.remaining(), None);
    }

    #[test]
    fn test_repeat_remaining() {
        let mut repeat = Repeat::Times(3);
        assert_eq!(repeat.remaining(), Some(3));
        repeat.advance();
        assert_eq!(repeat.remaining(), Some(2));
        assert_eq!(Repeat::Times(0).remaining(), Some(1));
        assert_eq!(Repeat::Once.remaining(), Some(1));
    }
}
