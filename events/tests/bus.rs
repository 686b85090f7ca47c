//! Fault-isolation behavior of the player event bus.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use girder_rescue_core::{Command, PlayerEvent};
use girder_rescue_events::{PlayerBus, PlayerObserver};

struct Panicky;

impl PlayerObserver for Panicky {
    fn on_player_event(&self, _event: &PlayerEvent, _out: &mut Vec<Command>) {
        panic!("observer failure");
    }
}

struct Recorder {
    calls: AtomicUsize,
}

impl PlayerObserver for Recorder {
    fn on_player_event(&self, _event: &PlayerEvent, out: &mut Vec<Command>) {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        out.push(Command::ResetStreak);
    }
}

#[test]
fn panicking_observer_never_blocks_the_rest() {
    let mut bus = PlayerBus::new();
    let recorder = Arc::new(Recorder {
        calls: AtomicUsize::new(0),
    });

    assert!(bus.subscribe(Arc::new(Panicky)));
    assert!(bus.subscribe(Arc::clone(&recorder) as Arc<dyn PlayerObserver>));

    let mut out = Vec::new();
    bus.publish(&PlayerEvent::Died, &mut out);

    assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(out, vec![Command::ResetStreak]);
}

#[test]
fn panicking_observer_contributes_no_partial_batch() {
    struct HalfThenPanic;
    impl PlayerObserver for HalfThenPanic {
        fn on_player_event(&self, _event: &PlayerEvent, out: &mut Vec<Command>) {
            out.push(Command::LoseLife);
            panic!("after partial output");
        }
    }

    let mut bus = PlayerBus::new();
    assert!(bus.subscribe(Arc::new(HalfThenPanic)));

    let mut out = Vec::new();
    bus.publish(&PlayerEvent::Died, &mut out);
    // The panicked observer's scratch batch is discarded wholesale.
    assert!(out.is_empty());
}
