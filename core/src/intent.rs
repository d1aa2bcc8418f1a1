//! Player intent and the hand-off used by input producers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;

/// Everything the input layer may ask of the core during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Movement expressed in the player's local frame: `x` is forward (+) or
    /// backward (-), `y` strafes right (+) or left (-). Consumers clamp each
    /// component to `-1.0..=1.0`.
    pub move_vector: Vec2,
    /// Camera rotation in radians to apply this frame.
    pub rotate_delta: f32,
    /// Requests a shot with the active weapon.
    pub fire: bool,
    /// Requests cycling to the next usable weapon.
    pub switch_weapon: bool,
    /// Requests a fresh session, applied at the next frame boundary.
    pub restart: bool,
}

impl Intent {
    /// Intent that asks for nothing.
    pub const IDLE: Self = Self {
        move_vector: Vec2::ZERO,
        rotate_delta: 0.0,
        fire: false,
        switch_weapon: false,
        restart: false,
    };

    /// Reports whether the intent carries no request at all.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Single-slot, last-write-wins hand-off between an input producer and the
/// frame loop.
///
/// Producers call [`IntentSlot::publish`] at their own cadence; every write
/// replaces any unread value. The frame loop calls [`IntentSlot::take`] once
/// per frame and never waits: an empty slot yields [`Intent::IDLE`]. Clones
/// share the same slot.
#[derive(Clone, Debug, Default)]
pub struct IntentSlot {
    latest: Arc<Mutex<Option<Intent>>>,
}

impl IntentSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the intent, discarding any value the consumer has not read yet.
    pub fn publish(&self, intent: Intent) {
        *self.lock() = Some(intent);
    }

    /// Removes and returns the most recent intent, or the idle intent when
    /// nothing was published since the last read.
    #[must_use]
    pub fn take(&self) -> Intent {
        self.lock().take().unwrap_or(Intent::IDLE)
    }

    /// Returns the unread intent without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<Intent> {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Intent>> {
        // A producer that panicked mid-write still left a complete `Option`.
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_slot_yields_idle_intent() {
        let slot = IntentSlot::new();

        assert!(slot.take().is_idle());
        assert_eq!(slot.peek(), None);
    }

    #[test]
    fn later_publish_overwrites_unread_value() {
        let slot = IntentSlot::new();
        slot.publish(Intent {
            fire: true,
            ..Intent::IDLE
        });
        slot.publish(Intent {
            rotate_delta: 0.5,
            ..Intent::IDLE
        });

        let intent = slot.take();
        assert!(!intent.fire);
        assert_eq!(intent.rotate_delta, 0.5);
        assert!(slot.take().is_idle());
    }

    #[test]
    fn producer_thread_hands_off_latest_intent() {
        let slot = IntentSlot::new();
        let producer = slot.clone();

        let handle = thread::spawn(move || {
            for step in 0..10 {
                producer.publish(Intent {
                    rotate_delta: step as f32,
                    ..Intent::IDLE
                });
            }
        });
        handle.join().expect("producer thread finished");

        assert_eq!(slot.take().rotate_delta, 9.0);
    }
}
