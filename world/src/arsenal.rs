//! Weapon inventory and firing state machine.

use std::time::Duration;

use duskfall_core::{Ammo, WeaponKind};

/// What the arsenal does after a shot empties the active weapon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutoSwitch {
    /// Switch to the next usable weapon right away.
    #[default]
    OnEmpty,
    /// Stay on the empty weapon until the player toggles.
    Manual,
}

/// Whether the arsenal accepts a trigger pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponPhase {
    /// Ready to fire.
    Idle,
    /// Playing the firing animation.
    Busy {
        /// Weapon whose animation is playing.
        weapon: WeaponKind,
        /// Time spent in the animation so far.
        elapsed: Duration,
    },
}

/// Result of pulling the trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A firing animation is still running; nothing happened.
    Busy,
    /// The active weapon has no ammunition left.
    Empty {
        /// Weapon whose trigger was pulled.
        weapon: WeaponKind,
    },
    /// The weapon fired.
    Fired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Ammunition left in that weapon.
        remaining: Ammo,
        /// Weapon switched to because the shot emptied the magazine.
        switched_to: Option<WeaponKind>,
    },
}

/// The player's weapons, their ammunition and the firing animation.
#[derive(Clone, Debug)]
pub struct Arsenal {
    active: usize,
    ammo: [Ammo; WeaponKind::ALL.len()],
    phase: WeaponPhase,
    auto_switch: AutoSwitch,
}

impl Arsenal {
    /// Creates a fully stocked arsenal holding the first weapon.
    #[must_use]
    pub fn new(auto_switch: AutoSwitch) -> Self {
        Self {
            active: 0,
            ammo: WeaponKind::ALL.map(|weapon| weapon.spec().max_ammo),
            phase: WeaponPhase::Idle,
            auto_switch,
        }
    }

    /// Overrides the ammunition of a weapon.
    pub fn set_ammo(&mut self, weapon: WeaponKind, ammo: Ammo) {
        self.ammo[weapon.index()] = ammo;
    }

    /// Weapon currently in hand.
    #[must_use]
    pub fn active(&self) -> WeaponKind {
        WeaponKind::ALL[self.active]
    }

    /// Ammunition held by the provided weapon.
    #[must_use]
    pub fn ammo(&self, weapon: WeaponKind) -> Ammo {
        self.ammo[weapon.index()]
    }

    /// Current phase of the firing animation.
    #[must_use]
    pub const fn phase(&self) -> WeaponPhase {
        self.phase
    }

    /// Reports whether a firing animation is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, WeaponPhase::Busy { .. })
    }

    /// Policy applied when a shot empties the active weapon.
    #[must_use]
    pub const fn auto_switch(&self) -> AutoSwitch {
        self.auto_switch
    }

    /// Frame of the running firing animation, zero while idle.
    #[must_use]
    pub fn frame(&self) -> u32 {
        let WeaponPhase::Busy { weapon, elapsed } = self.phase else {
            return 0;
        };
        let spec = weapon.spec();
        if spec.animation_time.is_zero() {
            return 0;
        }
        let frame = elapsed.as_nanos() / spec.animation_time.as_nanos();
        u32::try_from(frame)
            .unwrap_or(u32::MAX)
            .min(spec.frames.saturating_sub(1))
    }

    /// Pulls the trigger of the active weapon.
    pub fn fire(&mut self) -> FireOutcome {
        if self.is_busy() {
            return FireOutcome::Busy;
        }

        let weapon = self.active();
        let Some(remaining) = self.ammo[self.active].spend() else {
            return FireOutcome::Empty { weapon };
        };
        self.ammo[self.active] = remaining;
        self.phase = WeaponPhase::Busy {
            weapon,
            elapsed: Duration::ZERO,
        };

        let switched_to = if remaining.is_empty() && self.auto_switch == AutoSwitch::OnEmpty {
            self.toggle().map(|(_, to)| to)
        } else {
            None
        };

        FireOutcome::Fired {
            weapon,
            remaining,
            switched_to,
        }
    }

    /// Cycles to the next weapon that still has ammunition.
    ///
    /// Returns the previous and new weapon, or `None` when no other weapon is
    /// usable. Ammunition is kept per weapon across switches.
    pub fn toggle(&mut self) -> Option<(WeaponKind, WeaponKind)> {
        let count = WeaponKind::ALL.len();
        let from = self.active();
        let next = (1..count)
            .map(|offset| (self.active + offset) % count)
            .find(|&index| !self.ammo[index].is_empty())?;

        self.active = next;
        Some((from, self.active()))
    }

    /// Advances the firing animation; returns `true` when it just finished.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let WeaponPhase::Busy { weapon, elapsed } = self.phase else {
            return false;
        };

        let elapsed = elapsed + dt;
        if elapsed >= weapon.spec().busy_duration() {
            self.phase = WeaponPhase::Idle;
            true
        } else {
            self.phase = WeaponPhase::Busy { weapon, elapsed };
            false
        }
    }
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new(AutoSwitch::default())
    }
}
