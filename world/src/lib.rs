#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Duskfall.

mod agents;
mod arsenal;
mod level;
mod player;

use std::time::Duration;

use duskfall_core::{
    AgentId, Command, Event, GameConfig, GameStatus, PlayerConfig, SoundCue, WELCOME_BANNER,
};

use agents::{Agent, HitOutcome};

pub use arsenal::{Arsenal, AutoSwitch, FireOutcome, WeaponPhase};
pub use level::{Level, DEFAULT_MAP};
pub use player::{motion_from_local, Player};

/// Represents the authoritative Duskfall world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level: Level,
    player_config: PlayerConfig,
    agents_enabled: bool,
    initial_arsenal: Arsenal,
    player: Player,
    arsenal: Arsenal,
    agents: Vec<Agent>,
    status: GameStatus,
    last_dt: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a world for the provided level and configuration.
    #[must_use]
    pub fn new(level: Level, config: &GameConfig) -> Self {
        Self::with_arsenal(level, config, Arsenal::default())
    }

    /// Creates a world whose player starts with the provided arsenal.
    ///
    /// Restarting the session restores this arsenal.
    #[must_use]
    pub fn with_arsenal(level: Level, config: &GameConfig, arsenal: Arsenal) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            player: Player::new(&config.player),
            arsenal: arsenal.clone(),
            agents: Vec::new(),
            player_config: config.player.clone(),
            agents_enabled: config.agents.enabled,
            initial_arsenal: arsenal,
            level,
            status: GameStatus::Playing,
            last_dt: Duration::ZERO,
            tick_index: 0,
        };
        world.reset();
        world
    }

    fn reset(&mut self) {
        self.player = Player::new(&self.player_config);
        self.arsenal = self.initial_arsenal.clone();
        self.agents = if self.agents_enabled {
            self.level
                .spawns()
                .iter()
                .zip(0u32..)
                .map(|(spawn, id)| Agent::new(AgentId::new(id), spawn.kind, spawn.position))
                .collect()
        } else {
            Vec::new()
        };
        self.status = GameStatus::Playing;
        self.last_dt = Duration::ZERO;
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    fn damage_player(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let health = self.player.take_damage(amount);
        out_events.push(Event::PlayerDamaged { amount, health });
        out_events.push(Event::SoundCue {
            cue: SoundCue::Damage,
        });

        if self.player.is_dead() {
            let score = self.player.score();
            self.status = GameStatus::GameOver { score };
            tracing::info!(score, "player died, game over");
            out_events.push(Event::GameOver { score });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Level::default(), &GameConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is over every command except [`Command::Restart`] is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if matches!(world.status, GameStatus::GameOver { .. }) && command != Command::Restart {
        return;
    }

    match command {
        Command::MovePlayer { motion, rotation } => {
            let from = world.player.pose().position;
            world
                .player
                .apply_intent(motion, rotation, world.level.grid());
            let to = world.player.pose().position;
            if from != to {
                out_events.push(Event::PlayerMoved { from, to });
            }
        }
        Command::FireWeapon => match world.arsenal.fire() {
            FireOutcome::Busy => {}
            FireOutcome::Empty { weapon } => {
                out_events.push(Event::WeaponEmpty { weapon });
                out_events.push(Event::SoundCue {
                    cue: SoundCue::Empty,
                });
            }
            FireOutcome::Fired {
                weapon,
                remaining,
                switched_to,
            } => {
                world.player.set_shot(true);
                out_events.push(Event::WeaponFired { weapon, remaining });
                out_events.push(Event::SoundCue {
                    cue: SoundCue::Fire,
                });
                if let Some(to) = switched_to {
                    tracing::debug!(from = weapon.name(), to = to.name(), "weapon emptied");
                    out_events.push(Event::WeaponSwitched { from: weapon, to });
                    out_events.push(Event::SoundCue {
                        cue: SoundCue::Switch,
                    });
                }
            }
        },
        Command::ToggleWeapon => {
            if let Some((from, to)) = world.arsenal.toggle() {
                tracing::debug!(from = from.name(), to = to.name(), "weapon switched");
                out_events.push(Event::WeaponSwitched { from, to });
                out_events.push(Event::SoundCue {
                    cue: SoundCue::Switch,
                });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.last_dt = dt;
            out_events.push(Event::TimeAdvanced { dt });

            if world.arsenal.tick(dt) {
                world.player.set_shot(false);
                out_events.push(Event::WeaponReady {
                    weapon: world.arsenal.active(),
                });
            }
            if world.player.recover_health(dt) {
                out_events.push(Event::PlayerHealed {
                    health: world.player.health(),
                });
            }
            for agent in &mut world.agents {
                agent.tick(dt);
            }
        }
        Command::DamagePlayer { amount } => world.damage_player(amount, out_events),
        Command::AdvanceAgent { agent, toward } => {
            let occupied: Vec<_> = world
                .agents
                .iter()
                .filter(|other| other.id != agent && other.is_alive())
                .flat_map(Agent::claimed_cells)
                .collect();
            let step = world.last_dt.as_secs_f32();
            let grid = world.level.grid();
            let Some(moving) = world.agents.iter_mut().find(|candidate| candidate.id == agent)
            else {
                return;
            };
            if moving.can_act() {
                let from = moving.position;
                let speed = moving.kind.spec().speed;
                if moving.advance(toward, speed * step, grid, |cell| occupied.contains(&cell)) {
                    out_events.push(Event::AgentAdvanced {
                        agent,
                        from,
                        to: moving.position,
                    });
                }
            }
        }
        Command::AgentAttack { agent, landed } => {
            let Some(attacker) = world.agent_mut(agent) else {
                return;
            };
            if !attacker.attack() {
                return;
            }
            let damage = attacker.kind.spec().damage;
            out_events.push(Event::AgentAttacked { agent, landed });
            out_events.push(Event::SoundCue {
                cue: SoundCue::AgentAttack,
            });
            if landed {
                world.damage_player(damage, out_events);
            }
        }
        Command::HitAgent { agent, damage } => {
            let Some(target) = world.agent_mut(agent) else {
                return;
            };
            match target.hit(damage) {
                Some(HitOutcome::Hurt { health }) => {
                    out_events.push(Event::AgentHit { agent, health });
                    out_events.push(Event::SoundCue {
                        cue: SoundCue::AgentPain,
                    });
                }
                Some(HitOutcome::Killed { points }) => {
                    world.player.award(points);
                    tracing::info!(agent = agent.get(), points, "agent killed");
                    out_events.push(Event::AgentKilled { agent, points });
                    out_events.push(Event::SoundCue {
                        cue: SoundCue::AgentDeath,
                    });
                }
                None => {}
            }
        }
        Command::Restart => {
            world.reset();
            tracing::info!("session restarted");
            out_events.push(Event::GameRestarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use duskfall_core::{AgentView, Decoration, GameStatus, GridMap, PlayerSnapshot};

    use super::{Arsenal, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level's wall layout.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        world.level.grid()
    }

    /// Sprites placed in the level at load time.
    #[must_use]
    pub fn decorations(world: &World) -> &[Decoration] {
        world.level.decorations()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Provides read-only access to the player's weapons.
    #[must_use]
    pub fn arsenal(world: &World) -> &Arsenal {
        &world.arsenal
    }

    /// Captures a read-only view of the level's agents.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        AgentView::from_snapshots(world.agents.iter().map(|agent| agent.snapshot()).collect())
    }

    /// Whether the session is running or over.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
