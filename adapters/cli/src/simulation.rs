//! Fixed-order frame loop tying the world, systems and scene together.

use std::time::Duration;

use duskfall_core::{
    Command, Event, GameConfig, GameStatus, Intent, IntentSlot, SoundCue, Viewport,
};
use duskfall_rendering::{Hud, Scene, SceneDraw, SceneSprite, WallColumn};
use duskfall_system_agents::AgentBehaviour;
use duskfall_system_raycasting::{depth_buffer, ColumnHit, RayCaster, WallSide};
use duskfall_system_sprites::{compose, project, DrawItem, SpriteObject, SpriteRegistry};
use duskfall_world::{self as world, motion_from_local, query, Level, World};
use glam::Vec2;

/// Seconds a full-strength damage flash takes to fade.
const FLASH_FADE_SECONDS: f32 = 0.35;

/// End-of-run figures reported by headless sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Frames simulated.
    pub frames: u64,
    /// Session state after the last frame.
    pub status: GameStatus,
    /// Player score.
    pub score: u32,
    /// Player health.
    pub health: u32,
    /// Agents still alive.
    pub agents_alive: usize,
    /// Shots fired across the run.
    pub shots: u32,
}

/// Owns every piece of per-session state and advances it one frame at a time.
///
/// Each frame runs in a fixed order: take the intent, restart if asked, apply
/// player and weapon commands, tick, run agent behaviour, animate sprites and
/// cast rays. [`Simulation::populate_scene`] then projects and composes the
/// result.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    viewport: Viewport,
    world: World,
    behaviour: AgentBehaviour,
    registry: SpriteRegistry,
    caster: RayCaster,
    intents: IntentSlot,
    columns: Vec<ColumnHit>,
    events: Vec<Event>,
    commands: Vec<Command>,
    since_switch: Duration,
    damage_flash: f32,
    frames: u64,
    shots: u32,
}

impl Simulation {
    /// Builds a session for the level using the provided configuration.
    #[must_use]
    pub fn new(level: Level, config: GameConfig) -> Self {
        let viewport = config.viewport();
        let max_depth = config.raycasting.max_depth;
        let world = World::new(level, &config);
        let registry = SpriteRegistry::from_decorations(query::decorations(&world));
        let behaviour = AgentBehaviour::new(config.agents.seed, viewport, max_depth);
        let caster = RayCaster::new(viewport, max_depth);
        let columns = caster.cast(&query::player(&world).pose, query::grid(&world));

        Self {
            since_switch: config.player.weapon_switch_cooldown(),
            config,
            viewport,
            world,
            behaviour,
            registry,
            caster,
            intents: IntentSlot::new(),
            columns,
            events: Vec::new(),
            commands: Vec::new(),
            damage_flash: 0.0,
            frames: 0,
            shots: 0,
        }
    }

    /// Handle input producers publish to.
    #[must_use]
    pub fn intents(&self) -> IntentSlot {
        self.intents.clone()
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Ray results from the most recent frame, one per screen column.
    #[must_use]
    pub fn columns(&self) -> &[ColumnHit] {
        &self.columns
    }

    /// Advances the session by one frame and returns the events it produced.
    pub fn step(&mut self, dt: Duration) -> &[Event] {
        self.events.clear();
        let intent = self.intents.take();

        if intent.restart {
            self.restart();
        }

        self.apply_intent(intent, dt);
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        self.commands.clear();
        self.behaviour.handle(
            &self.events,
            &query::player(&self.world),
            &query::agent_view(&self.world),
            query::grid(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        self.registry.update(dt);
        self.caster.cast_into(
            &query::player(&self.world).pose,
            query::grid(&self.world),
            &mut self.columns,
        );

        self.observe(dt);
        self.frames += 1;
        &self.events
    }

    fn restart(&mut self) {
        world::apply(&mut self.world, Command::Restart, &mut self.events);
        self.registry = SpriteRegistry::from_decorations(query::decorations(&self.world));
        self.since_switch = self.config.player.weapon_switch_cooldown();
        self.damage_flash = 0.0;
    }

    fn apply_intent(&mut self, intent: Intent, dt: Duration) {
        self.since_switch = self.since_switch.saturating_add(dt);

        let pose = query::player(&self.world).pose;
        let distance = self.config.player.speed * dt.as_secs_f32();
        let motion = motion_from_local(intent.move_vector, pose.angle, distance);
        if motion != Vec2::ZERO || intent.rotate_delta != 0.0 {
            world::apply(
                &mut self.world,
                Command::MovePlayer {
                    motion,
                    rotation: intent.rotate_delta,
                },
                &mut self.events,
            );
        }

        if intent.fire {
            world::apply(&mut self.world, Command::FireWeapon, &mut self.events);
        }

        if intent.switch_weapon && self.since_switch >= self.config.player.weapon_switch_cooldown()
        {
            let before = self.events.len();
            world::apply(&mut self.world, Command::ToggleWeapon, &mut self.events);
            if self.events[before..]
                .iter()
                .any(|event| matches!(event, Event::WeaponSwitched { .. }))
            {
                self.since_switch = Duration::ZERO;
            }
        }
    }

    fn observe(&mut self, dt: Duration) {
        self.damage_flash = (self.damage_flash - dt.as_secs_f32() / FLASH_FADE_SECONDS).max(0.0);

        for event in &self.events {
            match event {
                Event::PlayerDamaged { .. } => self.damage_flash = 1.0,
                Event::WeaponFired { .. } => self.shots += 1,
                Event::SoundCue { cue } => log_cue(*cue),
                Event::GameOver { score } => {
                    tracing::info!(score, frame = self.frames, "game over");
                }
                _ => {}
            }
        }
    }

    /// Replaces the scene's draws and HUD with the current frame.
    pub fn populate_scene(&self, scene: &mut Scene) {
        let player = query::player(&self.world);
        let agents = query::agent_view(&self.world);

        let mut objects = self.registry.objects().to_vec();
        objects.extend(agents.iter().map(SpriteObject::for_agent));
        let depths = depth_buffer(&self.columns);
        let sprites = project(&objects, &player.pose, &self.viewport, &depths);

        scene.draws.clear();
        scene.draws.extend(
            compose(&self.columns, &sprites)
                .iter()
                .filter_map(|item| self.scene_draw(item)),
        );

        let arsenal = query::arsenal(&self.world);
        let weapon = arsenal.active();
        scene.hud = Hud {
            health: player.health,
            max_health: player.max_health,
            score: player.score,
            weapon,
            ammo: arsenal.ammo(weapon),
            weapon_frame: arsenal.frame(),
            damage_flash: self.damage_flash,
            status: query::status(&self.world),
        };
    }

    fn scene_draw(&self, item: &DrawItem) -> Option<SceneDraw> {
        match item {
            DrawItem::Wall(hit) => {
                let wall = hit.wall?;
                let width = self.viewport.column_width();
                Some(SceneDraw::Wall(WallColumn {
                    left: hit.column as f32 * width,
                    width,
                    height: hit.projected_height,
                    depth: hit.distance,
                    wall,
                    texture_offset: hit.texture_offset,
                    shaded: hit.side == WallSide::Horizontal,
                }))
            }
            DrawItem::Sprite(sprite) => Some(SceneDraw::Sprite(SceneSprite {
                origin: Vec2::new(sprite.left(), sprite.top(self.viewport.height())),
                size: sprite.size,
                depth: sprite.depth,
                image: sprite.image,
                frame: sprite.frame,
            })),
        }
    }

    /// Figures describing the session so far.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let player = query::player(&self.world);
        Summary {
            frames: self.frames,
            status: query::status(&self.world),
            score: player.score,
            health: player.health,
            agents_alive: query::agent_view(&self.world)
                .iter()
                .filter(|agent| agent.is_alive())
                .count(),
            shots: self.shots,
        }
    }
}

fn log_cue(cue: SoundCue) {
    tracing::trace!(?cue, "sound cue");
}
