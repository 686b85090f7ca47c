#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player event bus for the Girder Rescue engine.
//!
//! The world reports the player's fortunes as [`PlayerEvent`] values; the bus
//! fans each one out to registered observers, which answer with command
//! batches for the next `apply` pass. A misbehaving observer is isolated: a
//! panic inside one subscriber is caught and logged, and dispatch continues
//! with the rest.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use girder_rescue_core::{Command, PlayerEvent};

/// Receives player events and responds with commands.
pub trait PlayerObserver: Send + Sync {
    /// Reacts to a single player event, pushing any resulting commands.
    fn on_player_event(&self, event: &PlayerEvent, out: &mut Vec<Command>);
}

/// Fan-out registry for [`PlayerObserver`] subscribers.
#[derive(Default)]
pub struct PlayerBus {
    observers: Vec<Arc<dyn PlayerObserver>>,
}

impl PlayerBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Re-registering the same observer (by identity)
    /// is a no-op; returns whether the observer was added.
    pub fn subscribe(&mut self, observer: Arc<dyn PlayerObserver>) -> bool {
        let duplicate = self
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer));
        if duplicate {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes an observer by identity; returns whether it was present.
    pub fn unsubscribe(&mut self, observer: &Arc<dyn PlayerObserver>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|existing| !Arc::ptr_eq(existing, observer));
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether the bus has no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Dispatches one event to every observer in subscription order,
    /// concatenating their command batches into `out`.
    ///
    /// Dispatch walks a snapshot of the subscriber list, so the set observed
    /// by this publish is exactly the set registered when it began.
    pub fn publish(&self, event: &PlayerEvent, out: &mut Vec<Command>) {
        let snapshot: Vec<Arc<dyn PlayerObserver>> = self.observers.clone();
        for observer in snapshot {
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut batch = Vec::new();
                observer.on_player_event(event, &mut batch);
                batch
            }));
            match result {
                Ok(batch) => out.extend(batch),
                Err(_) => {
                    log::warn!("player observer panicked while handling {event:?}; skipping");
                }
            }
        }
    }
}

/// Turns life and scoring events into progress commands.
pub struct ProgressRelay;

impl PlayerObserver for ProgressRelay {
    fn on_player_event(&self, event: &PlayerEvent, out: &mut Vec<Command>) {
        match event {
            PlayerEvent::Died => {
                out.push(Command::LoseLife);
                out.push(Command::ResetStreak);
            }
            PlayerEvent::ItemCollected { points, .. }
            | PlayerEvent::EnemySmashed { points } => {
                out.push(Command::AddScore { points: *points });
            }
            _ => {}
        }
    }
}

/// Revokes active power-ups when the player dies.
pub struct PowerUpRelay;

impl PlayerObserver for PowerUpRelay {
    fn on_player_event(&self, event: &PlayerEvent, out: &mut Vec<Command>) {
        if matches!(event, PlayerEvent::Died) {
            out.push(Command::CancelPowerUp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_rescue_core::ItemKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl PlayerObserver for Counter {
        fn on_player_event(&self, _event: &PlayerEvent, _out: &mut Vec<Command>) {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn duplicate_subscription_is_rejected() {
        let mut bus = PlayerBus::new();
        let observer: Arc<dyn PlayerObserver> = Arc::new(Counter(AtomicUsize::new(0)));
        assert!(bus.subscribe(Arc::clone(&observer)));
        assert!(!bus.subscribe(Arc::clone(&observer)));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn distinct_observers_of_the_same_type_both_register() {
        let mut bus = PlayerBus::new();
        let first: Arc<dyn PlayerObserver> = Arc::new(Counter(AtomicUsize::new(0)));
        let second: Arc<dyn PlayerObserver> = Arc::new(Counter(AtomicUsize::new(0)));
        assert!(bus.subscribe(first));
        assert!(bus.subscribe(second));
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn unsubscribe_removes_by_identity() {
        let mut bus = PlayerBus::new();
        let observer: Arc<dyn PlayerObserver> = Arc::new(Counter(AtomicUsize::new(0)));
        let stranger: Arc<dyn PlayerObserver> = Arc::new(Counter(AtomicUsize::new(0)));
        assert!(bus.subscribe(Arc::clone(&observer)));
        assert!(!bus.unsubscribe(&stranger));
        assert!(bus.unsubscribe(&observer));
        assert!(bus.is_empty());
    }

    #[test]
    fn progress_relay_charges_a_death() {
        let relay = ProgressRelay;
        let mut out = Vec::new();
        relay.on_player_event(&PlayerEvent::Died, &mut out);
        assert_eq!(out, vec![Command::LoseLife, Command::ResetStreak]);
    }

    #[test]
    fn progress_relay_credits_collections_and_smashes() {
        let relay = ProgressRelay;
        let mut out = Vec::new();
        relay.on_player_event(
            &PlayerEvent::ItemCollected {
                item: ItemKind::Handbag,
                points: 500,
            },
            &mut out,
        );
        relay.on_player_event(&PlayerEvent::EnemySmashed { points: 200 }, &mut out);
        assert_eq!(
            out,
            vec![
                Command::AddScore { points: 500 },
                Command::AddScore { points: 200 },
            ]
        );
    }

    #[test]
    fn power_up_relay_only_reacts_to_death() {
        let relay = PowerUpRelay;
        let mut out = Vec::new();
        relay.on_player_event(
            &PlayerEvent::ItemCollected {
                item: ItemKind::Bonnet,
                points: 200,
            },
            &mut out,
        );
        assert!(out.is_empty());
        relay.on_player_event(&PlayerEvent::Died, &mut out);
        assert_eq!(out, vec![Command::CancelPowerUp]);
    }

    #[test]
    fn publish_concatenates_batches_in_subscription_order() {
        let mut bus = PlayerBus::new();
        assert!(bus.subscribe(Arc::new(ProgressRelay)));
        assert!(bus.subscribe(Arc::new(PowerUpRelay)));

        let mut out = Vec::new();
        bus.publish(&PlayerEvent::Died, &mut out);
        assert_eq!(
            out,
            vec![
                Command::LoseLife,
                Command::ResetStreak,
                Command::CancelPowerUp,
            ]
        );
    }
}
