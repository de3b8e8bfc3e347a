//! Integration tests for drum pattern playback.
//!
//! Tests the full path: pattern text → resolver → scheduler → driver → sink.
//! No MIDI hardware required — a recording sink stands in for the device.

use std::time::Duration;

use kopad::controller::Controller;
use kopad::pattern::compile;
use kopad::playback::{
    play_pattern, play_timeline, MidiChannel, NoteSink, Pacer, Session, TransportError,
};
use kopad::reference::Resolver;
use kopad::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    On(u8, u8),
    Off(u8),
}

/// Records every call; optionally fails the n-th trigger (1-based).
#[derive(Default)]
struct RecordingSink {
    calls: Vec<Call>,
    channels: Vec<u8>,
    triggers: usize,
    fail_on_trigger: Option<usize>,
}

impl NoteSink for RecordingSink {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError> {
        self.triggers += 1;
        if self.fail_on_trigger == Some(self.triggers) {
            return Err(TransportError::Send("cable pulled".into()));
        }
        self.calls.push(Call::On(note, velocity));
        self.channels.push(channel.number());
        Ok(())
    }

    fn release_note(&mut self, note: u8, _channel: MidiChannel) -> Result<(), TransportError> {
        self.calls.push(Call::Off(note));
        Ok(())
    }
}

/// Adds up requested waits instead of sleeping.
#[derive(Default)]
struct VirtualClock {
    elapsed: Duration,
}

impl Pacer for VirtualClock {
    fn wait(&mut self, duration: Duration) {
        self.elapsed += duration;
    }
}

fn session(sink: RecordingSink) -> Session<RecordingSink, VirtualClock> {
    Session::with_pacer(sink, VirtualClock::default())
}

#[test]
fn references_of_every_kind_resolve() {
    let text = "\
x...............  # kick
.x..............  # A2
..x.............  # \"NT HH CLOSED\"
...x............  # 50
....x...........  # \"open hat\"
";
    let mut controller = Controller::with_session(session(RecordingSink::default()));
    let report = controller.play_drum_pattern(text, 120.0).unwrap();

    assert!(report.unresolved.is_empty());
    assert_eq!(report.events_played, 5);
    let ons: Vec<u8> = controller
        .session()
        .sink()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::On(n, _) => Some(*n),
            Call::Off(_) => None,
        })
        .collect();
    assert_eq!(ons, vec![36, 40, 43, 50, 46]);
}

#[test]
fn unresolved_reference_plays_kick_and_is_reported() {
    let text = "x...  # NOTSOUND\n..x.  # snare";
    let mut controller = Controller::with_session(session(RecordingSink::default()));
    let report = controller.play_drum_pattern(text, 120.0).unwrap();

    assert_eq!(report.unresolved, vec!["NOTSOUND".to_string()]);
    assert_eq!(report.recognized, vec![("snare".to_string(), 40)]);
    assert_eq!(
        controller.session().sink().calls,
        vec![Call::On(36, 100), Call::Off(36), Call::On(40, 100), Call::Off(40)]
    );
    assert!(report
        .to_string()
        .contains("these references were not recognized and defaulted to kick"));
}

#[test]
fn velocities_follow_the_symbols() {
    let text = "xo19v64V  # kick";
    let mut controller = Controller::with_session(session(RecordingSink::default()));
    controller.play_drum_pattern(text, 120.0).unwrap();

    let velocities: Vec<u8> = controller
        .session()
        .sink()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::On(_, v) => Some(*v),
            Call::Off(_) => None,
        })
        .collect();
    assert_eq!(velocities, vec![100, 60, 14, 126, 64]);
}

#[test]
fn pattern_duration_includes_rests() {
    // 16 steps at 120 BPM = 2 seconds, whatever the hits
    let resolver = Resolver::default();
    let compiled = compile("x.......x.......  # kick", 120.0, &resolver).unwrap();
    let mut session = session(RecordingSink::default());
    let report = play_timeline(&mut session, &compiled.timeline).unwrap();

    assert_eq!(report.steps_played, 2);
    assert_eq!(session.pacer().elapsed, Duration::from_secs(2));
}

#[test]
fn session_channel_reaches_the_sink() {
    let resolver = Resolver::default();
    let compiled = compile("x.x.  # kick", 120.0, &resolver).unwrap();
    let mut session =
        session(RecordingSink::default()).with_channel(MidiChannel::new(10).unwrap());
    play_pattern(&mut session, &compiled).unwrap();

    assert_eq!(session.sink().channels, vec![10, 10]);
}

#[test]
fn transport_failure_on_third_of_five_steps() {
    // two notes per step; trigger #6 is the second note of step three
    let text = "\
x.x.x.x.x.  # kick
x.x.x.x.x.  # snare
";
    let sink = RecordingSink {
        fail_on_trigger: Some(6),
        ..RecordingSink::default()
    };
    let mut controller = Controller::with_session(session(sink));
    let err = controller.play_drum_pattern(text, 120.0).unwrap_err();

    let err = match err {
        Error::Playback(err) => err,
        other => panic!("expected a playback error, got {other:?}"),
    };
    assert_eq!(err.completed_steps, 2);
    assert_eq!(err.events_played, 4);
    assert_eq!(err.source, TransportError::Send("cable pulled".into()));

    let cycle = [Call::On(36, 100), Call::On(40, 100), Call::Off(36), Call::Off(40)];
    let mut expected = Vec::new();
    expected.extend_from_slice(&cycle);
    expected.extend_from_slice(&cycle);
    // step three: the kick was triggered, then released when the snare failed
    expected.extend_from_slice(&[Call::On(36, 100), Call::Off(36)]);
    assert_eq!(controller.session().sink().calls, expected);
}

#[test]
fn empty_pattern_plays_nothing() {
    let mut controller = Controller::with_session(session(RecordingSink::default()));
    let report = controller.play_drum_pattern("\n\n   \n", 120.0).unwrap();
    assert_eq!(report.events_played, 0);
    assert!(controller.session().sink().calls.is_empty());
}
