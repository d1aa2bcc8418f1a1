#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Duskfall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters turn player [`Intent`]
//! into [`Command`] values, the world executes those commands via its
//! `apply` entry point and broadcasts [`Event`] values, and systems consume
//! event streams plus immutable snapshots to respond with new command
//! batches.

mod config;
mod grid;
mod intent;

use std::{
    f32::consts::{PI, TAU},
    fmt,
    time::Duration,
};

use glam::Vec2;

pub use config::{
    AgentConfig, ConfigError, GameConfig, PlayerConfig, RayCastingConfig, Viewport,
    ViewportConfig,
};
pub use grid::{CellCoord, GridMap, MapLoadError, WallId};
pub use intent::{Intent, IntentSlot};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Duskfall.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rotates the player and then moves it with axis-separated collision.
    MovePlayer {
        /// World-space displacement requested for this frame.
        motion: Vec2,
        /// Rotation in radians applied before moving.
        rotation: f32,
    },
    /// Pulls the trigger of the active weapon.
    FireWeapon,
    /// Cycles to the next usable weapon.
    ToggleWeapon,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Inflicts damage on the player.
    DamagePlayer {
        /// Health points to remove.
        amount: u32,
    },
    /// Moves an agent toward the centre of an adjacent cell.
    AdvanceAgent {
        /// Agent that should move.
        agent: AgentId,
        /// Next cell on the agent's route.
        toward: CellCoord,
    },
    /// Resolves an agent's attack on the player.
    AgentAttack {
        /// Agent performing the attack.
        agent: AgentId,
        /// Whether the accuracy roll succeeded.
        landed: bool,
    },
    /// Applies weapon damage to an agent.
    HitAgent {
        /// Agent that was hit.
        agent: AgentId,
        /// Health points to remove.
        damage: u32,
    },
    /// Resets the player, weapons, agents and sprites to their initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player changed position.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after collision resolution.
        to: Vec2,
    },
    /// Confirms that the active weapon fired.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Ammunition left in the weapon after the shot.
        remaining: Ammo,
    },
    /// Reports a trigger pull on an empty weapon.
    WeaponEmpty {
        /// Weapon whose magazine is empty.
        weapon: WeaponKind,
    },
    /// Confirms that the active weapon changed.
    WeaponSwitched {
        /// Weapon that was active before the switch.
        from: WeaponKind,
        /// Weapon that is active now.
        to: WeaponKind,
    },
    /// Announces that the active weapon finished its firing animation.
    WeaponReady {
        /// Weapon that can fire again.
        weapon: WeaponKind,
    },
    /// Confirms that the player lost health.
    PlayerDamaged {
        /// Health points removed.
        amount: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Confirms that the player regenerated health.
    PlayerHealed {
        /// Health after regeneration.
        health: u32,
    },
    /// Announces that the session ended; only a restart resumes play.
    GameOver {
        /// Final score of the session.
        score: u32,
    },
    /// Announces that the session was reset to its initial state.
    GameRestarted,
    /// Confirms that an agent moved.
    AgentAdvanced {
        /// Agent that moved.
        agent: AgentId,
        /// Position before the move.
        from: Vec2,
        /// Position after collision resolution.
        to: Vec2,
    },
    /// Confirms that an agent attacked the player.
    AgentAttacked {
        /// Attacking agent.
        agent: AgentId,
        /// Whether the attack hit.
        landed: bool,
    },
    /// Confirms that an agent took damage and survived.
    AgentHit {
        /// Agent that was hit.
        agent: AgentId,
        /// Health remaining.
        health: u32,
    },
    /// Confirms that an agent died.
    AgentKilled {
        /// Agent that died.
        agent: AgentId,
        /// Score awarded to the player.
        points: u32,
    },
    /// Requests playback of a sound; the core never plays audio itself.
    SoundCue {
        /// Cue to play.
        cue: SoundCue,
    },
}

/// Named sound cues emitted at gameplay transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A weapon fired.
    Fire,
    /// The trigger was pulled on an empty weapon.
    Empty,
    /// The player was hurt.
    Damage,
    /// The active weapon changed.
    Switch,
    /// An agent was hurt.
    AgentPain,
    /// An agent died.
    AgentDeath,
    /// An agent attacked.
    AgentAttack,
}

/// Whether the session accepts gameplay commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Normal play.
    Playing,
    /// The player died; everything except a restart is ignored.
    GameOver {
        /// Score frozen at the moment of death.
        score: u32,
    },
}

/// Position and facing of a viewer in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in world units; one unit is one grid cell.
    pub position: Vec2,
    /// View angle in radians, zero facing increasing columns.
    pub angle: f32,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Unit vector pointing along the view direction.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Grid cell that contains the viewer.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::containing(self.position)
    }
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angle into `(-π, π]`.
#[must_use]
pub fn signed_angle(angle: f32) -> f32 {
    let wrapped = wrap_angle(angle);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Ammunition held by a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ammo {
    /// A countable number of rounds.
    Finite(u32),
    /// Melee weapons never run out.
    Unbounded,
}

impl Ammo {
    /// Reports whether no round is left.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    /// Ammunition left after spending one round, or `None` when empty.
    #[must_use]
    pub const fn spend(self) -> Option<Self> {
        match self {
            Self::Finite(0) => None,
            Self::Finite(rounds) => Some(Self::Finite(rounds - 1)),
            Self::Unbounded => Some(Self::Unbounded),
        }
    }
}

impl fmt::Display for Ammo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(rounds) => write!(f, "{rounds}"),
            Self::Unbounded => f.write_str("max"),
        }
    }
}

/// Weapons the player may carry, in switching order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponKind {
    /// Long-range weapon with a finite magazine.
    Shotgun,
    /// Melee weapon with unbounded use.
    Knife,
}

impl WeaponKind {
    /// Every weapon in switching order.
    pub const ALL: [Self; 2] = [Self::Shotgun, Self::Knife];

    /// Position of the weapon within [`WeaponKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        let mut index = 0;
        while index < Self::ALL.len() {
            if Self::ALL[index] as u8 == self as u8 {
                return index;
            }
            index += 1;
        }
        0
    }

    /// Static characteristics of the weapon.
    ///
    /// The shotgun deals 70 damage up to ten cells away and cycles through
    /// six 90 ms frames after each shot; the knife deals 50 damage within two
    /// cells and cycles through five 60 ms frames.
    #[must_use]
    pub const fn spec(self) -> WeaponSpec {
        match self {
            Self::Shotgun => WeaponSpec {
                damage: 70,
                range: 10.0,
                max_ammo: Ammo::Finite(100),
                animation_time: Duration::from_millis(90),
                frames: 6,
            },
            Self::Knife => WeaponSpec {
                damage: 50,
                range: 2.0,
                max_ammo: Ammo::Unbounded,
                animation_time: Duration::from_millis(60),
                frames: 5,
            },
        }
    }

    /// Reports whether the weapon is a melee weapon with unbounded use.
    #[must_use]
    pub const fn is_melee(self) -> bool {
        matches!(self.spec().max_ammo, Ammo::Unbounded)
    }

    /// Display name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shotgun => "shotgun",
            Self::Knife => "knife",
        }
    }
}

/// Static characteristics of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    /// Damage dealt per hit.
    pub damage: u32,
    /// Maximum hit distance in cells.
    pub range: f32,
    /// Ammunition a freshly issued weapon holds.
    pub max_ammo: Ammo,
    /// Duration of a single firing animation frame.
    pub animation_time: Duration,
    /// Number of frames in the firing animation.
    pub frames: u32,
}

impl WeaponSpec {
    /// Time the weapon stays busy after a shot.
    #[must_use]
    pub fn busy_duration(&self) -> Duration {
        self.animation_time * self.frames
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of hostile agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Ranged infantry.
    Soldier,
    /// Floating melee brawler.
    Cacodemon,
    /// Heavy long-range boss.
    Cyberdemon,
}

impl AgentKind {
    /// Static characteristics of the agent kind.
    #[must_use]
    pub const fn spec(self) -> AgentSpec {
        match self {
            Self::Soldier => AgentSpec {
                health: 100,
                damage: 10,
                accuracy: 0.15,
                speed: 1.8,
                attack_distance: 4.0,
                attack_cooldown: Duration::from_millis(900),
                pain_duration: Duration::from_millis(300),
                points: 100,
                scale: 0.6,
                height_shift: 0.38,
            },
            Self::Cacodemon => AgentSpec {
                health: 150,
                damage: 25,
                accuracy: 0.35,
                speed: 3.0,
                attack_distance: 1.0,
                attack_cooldown: Duration::from_millis(700),
                pain_duration: Duration::from_millis(300),
                points: 200,
                scale: 0.7,
                height_shift: 0.27,
            },
            Self::Cyberdemon => AgentSpec {
                health: 350,
                damage: 15,
                accuracy: 0.25,
                speed: 3.3,
                attack_distance: 6.0,
                attack_cooldown: Duration::from_millis(500),
                pain_duration: Duration::from_millis(200),
                points: 500,
                scale: 1.0,
                height_shift: 0.04,
            },
        }
    }

    /// Sprite used to draw the agent.
    #[must_use]
    pub const fn sprite(self) -> SpriteKey {
        match self {
            Self::Soldier => SpriteKey::Soldier,
            Self::Cacodemon => SpriteKey::Cacodemon,
            Self::Cyberdemon => SpriteKey::Cyberdemon,
        }
    }
}

/// Static characteristics of an agent kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSpec {
    /// Health the agent spawns with.
    pub health: u32,
    /// Damage dealt by a landed attack.
    pub damage: u32,
    /// Probability in `0.0..=1.0` that an attack lands.
    pub accuracy: f32,
    /// Walking speed in cells per second.
    pub speed: f32,
    /// Distance in cells from which the agent attacks instead of walking.
    pub attack_distance: f32,
    /// Minimum time between two attacks.
    pub attack_cooldown: Duration,
    /// Time the agent is stunned after being hit.
    pub pain_duration: Duration,
    /// Score awarded for killing the agent.
    pub points: u32,
    /// Sprite scale relative to a wall's height.
    pub scale: f32,
    /// Vertical sprite offset relative to the projected height.
    pub height_shift: f32,
}

/// Behavioural state of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Has not noticed the player.
    Idle,
    /// Routing toward the player.
    Chasing,
    /// Attacking from within range.
    Attacking,
    /// Briefly stunned after a hit.
    Pain,
    /// Killed; kept for its corpse sprite.
    Dead,
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Kind of agent.
    pub kind: AgentKind,
    /// Position in world units.
    pub position: Vec2,
    /// Health remaining.
    pub health: u32,
    /// Behavioural state.
    pub state: AgentState,
    /// Whether the agent has seen the player at least once.
    pub search_triggered: bool,
    /// Whether the attack cooldown elapsed.
    pub ready_to_attack: bool,
}

impl AgentSnapshot {
    /// Reports whether the agent is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != AgentState::Dead
    }

    /// Grid cell that contains the agent.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::containing(self.position)
    }
}

/// Read-only snapshot describing all agents.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the agent with the provided identifier.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of agents captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no agent was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position and facing.
    pub pose: Pose,
    /// Health remaining.
    pub health: u32,
    /// Health cap.
    pub max_health: u32,
    /// Score accumulated this session.
    pub score: u32,
    /// Whether a shot was fired during the current frame.
    pub shot: bool,
}

/// Sprite placed in the level at load time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// Image the decoration is drawn with.
    pub sprite: SpriteKey,
    /// Position in world units.
    pub position: Vec2,
}

/// Agent placed in the level at load time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSpawn {
    /// Kind of agent to spawn.
    pub kind: AgentKind,
    /// Position in world units.
    pub position: Vec2,
}

/// Images that world objects can be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Static candelabra decoration.
    Candelabra,
    /// Animated green light.
    GreenLight,
    /// Animated red light.
    RedLight,
    /// Soldier agent.
    Soldier,
    /// Cacodemon agent.
    Cacodemon,
    /// Cyberdemon agent.
    Cyberdemon,
}
