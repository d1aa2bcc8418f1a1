#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drives hostile agents and resolves the player's shots.
//!
//! Every tick, agents that can see the player, or have seen them before,
//! either attack from within their attack distance or take the next step of
//! a breadth-first route toward the player's cell. When the player fires,
//! the nearest visible agent covering the centre of the screen within the
//! weapon's range takes the hit.

use duskfall_core::{
    signed_angle, AgentSnapshot, AgentState, AgentView, CellCoord, Command, Event, GridMap,
    PlayerSnapshot, Viewport, WeaponKind,
};
use duskfall_system_pathfinding::{PathFinder, PathResult};
use duskfall_system_raycasting::has_line_of_sight;
use duskfall_system_sprites::profile;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Agent behaviour system that queues movement, attack and hit commands.
#[derive(Debug)]
pub struct AgentBehaviour {
    finder: PathFinder,
    viewport: Viewport,
    max_depth: u32,
    seed: u64,
    rng: ChaCha8Rng,
}

impl AgentBehaviour {
    /// Creates a behaviour system; `seed` fixes the outcome of attack rolls.
    #[must_use]
    pub fn new(seed: u64, viewport: Viewport, max_depth: u32) -> Self {
        Self {
            finder: PathFinder::default(),
            viewport,
            max_depth,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes world events and immutable views to emit agent commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        agents: &AgentView,
        grid: &GridMap,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::GameRestarted => self.rng = ChaCha8Rng::seed_from_u64(self.seed),
                Event::WeaponFired { weapon, .. } => {
                    if let Some(command) = self.resolve_shot(*weapon, player, agents, grid) {
                        out.push(command);
                    }
                }
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }

        if !ticked {
            return;
        }

        let player_cell = player.pose.cell();
        for agent in agents.iter() {
            if !matches!(
                agent.state,
                AgentState::Idle | AgentState::Chasing | AgentState::Attacking
            ) {
                continue;
            }
            if let Some(command) = self.act(agent, player, player_cell, agents, grid) {
                out.push(command);
            }
        }
    }

    fn act(
        &mut self,
        agent: &AgentSnapshot,
        player: &PlayerSnapshot,
        player_cell: CellCoord,
        agents: &AgentView,
        grid: &GridMap,
    ) -> Option<Command> {
        let target = player.pose.position;
        let sees_player = has_line_of_sight(grid, agent.position, target, self.max_depth);
        if !sees_player && !agent.search_triggered {
            return None;
        }

        let spec = agent.kind.spec();
        if sees_player && agent.position.distance(target) <= spec.attack_distance {
            if !agent.ready_to_attack {
                return None;
            }
            let landed = self.rng.gen::<f32>() < spec.accuracy;
            return Some(Command::AgentAttack {
                agent: agent.id,
                landed,
            });
        }

        let start = agent.cell();
        if start == player_cell {
            return None;
        }
        let route = self
            .finder
            .find_path_avoiding(start, player_cell, grid, |cell| {
                agents
                    .iter()
                    .any(|other| other.id != agent.id && other.is_alive() && other.cell() == cell)
            });
        match route {
            PathResult::Found(_) => route.next_step().map(|toward| Command::AdvanceAgent {
                agent: agent.id,
                toward,
            }),
            PathResult::NoPath => {
                tracing::trace!(agent = agent.id.get(), "agent cannot reach player");
                None
            }
        }
    }

    fn resolve_shot(
        &self,
        weapon: WeaponKind,
        player: &PlayerSnapshot,
        agents: &AgentView,
        grid: &GridMap,
    ) -> Option<Command> {
        let spec = weapon.spec();
        let pose = player.pose;
        let centre = self.viewport.width() * 0.5;

        let mut best: Option<(&AgentSnapshot, f32)> = None;
        for agent in agents.iter().filter(|agent| agent.is_alive()) {
            let offset = agent.position - pose.position;
            let distance = offset.length();
            if distance > spec.range {
                continue;
            }

            let delta = signed_angle(offset.y.atan2(offset.x) - pose.angle);
            let depth = distance * delta.cos();
            if depth <= 0.0 {
                continue;
            }

            let screen_x = (self.viewport.columns() as f32 * 0.5
                + delta / self.viewport.delta_angle())
                * self.viewport.column_width();
            let image = profile(agent.kind.sprite());
            let half_width =
                self.viewport.screen_distance() / depth * image.scale * image.aspect * 0.5;
            if (screen_x - centre).abs() >= half_width {
                continue;
            }
            if !has_line_of_sight(grid, pose.position, agent.position, self.max_depth) {
                continue;
            }

            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((agent, distance));
            }
        }

        best.map(|(agent, _)| {
            tracing::debug!(agent = agent.id.get(), weapon = weapon.name(), "shot landed");
            Command::HitAgent {
                agent: agent.id,
                damage: spec.damage,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use duskfall_core::{AgentId, AgentKind, Ammo, Pose};
    use glam::Vec2;

    use super::*;

    fn player_at(x: f32, y: f32, angle: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            pose: Pose::new(Vec2::new(x, y), angle),
            health: 100,
            max_health: 100,
            score: 0,
            shot: false,
        }
    }

    fn agent(id: u32, kind: AgentKind, x: f32, y: f32) -> AgentSnapshot {
        AgentSnapshot {
            id: AgentId::new(id),
            kind,
            position: Vec2::new(x, y),
            health: kind.spec().health,
            state: AgentState::Idle,
            search_triggered: false,
            ready_to_attack: true,
        }
    }

    fn behaviour() -> AgentBehaviour {
        AgentBehaviour::new(7, Viewport::default(), 20)
    }

    fn tick() -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }
    }

    fn fired(weapon: WeaponKind) -> Event {
        Event::WeaponFired {
            weapon,
            remaining: Ammo::Unbounded,
        }
    }

    #[test]
    fn unaware_agent_out_of_sight_stays_put() {
        let grid = GridMap::parse("#######\n#..#..#\n#..#..#\n#######").expect("map");
        let view = AgentView::from_snapshots(vec![agent(0, AgentKind::Soldier, 5.5, 1.5)]);
        let mut out = Vec::new();

        behaviour().handle(&[tick()], &player_at(1.5, 1.5, 0.0), &view, &grid, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn visible_agent_far_away_steps_toward_player() {
        let grid = GridMap::enclosed_room(12, 5);
        let view = AgentView::from_snapshots(vec![agent(0, AgentKind::Soldier, 10.5, 2.5)]);
        let mut out = Vec::new();

        behaviour().handle(&[tick()], &player_at(1.5, 2.5, 0.0), &view, &grid, &mut out);

        assert!(
            matches!(
                out.as_slice(),
                [Command::AdvanceAgent { agent, toward }]
                    if *agent == AgentId::new(0) && toward.column() == 9
            ),
            "unexpected commands {out:?}"
        );
    }

    #[test]
    fn agent_in_range_attacks_only_when_ready() {
        let grid = GridMap::enclosed_room(8, 5);
        let mut ready = agent(0, AgentKind::Soldier, 4.5, 2.5);
        let mut out = Vec::new();
        let player = player_at(1.5, 2.5, 0.0);

        behaviour().handle(
            &[tick()],
            &player,
            &AgentView::from_snapshots(vec![ready]),
            &grid,
            &mut out,
        );
        assert!(matches!(out.as_slice(), [Command::AgentAttack { .. }]));

        ready.ready_to_attack = false;
        out.clear();
        behaviour().handle(
            &[tick()],
            &player,
            &AgentView::from_snapshots(vec![ready]),
            &grid,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn attack_rolls_repeat_for_the_same_seed() {
        let grid = GridMap::enclosed_room(8, 5);
        let view = AgentView::from_snapshots(vec![agent(0, AgentKind::Cyberdemon, 4.5, 2.5)]);
        let player = player_at(1.5, 2.5, 0.0);

        let rolls = |mut system: AgentBehaviour| {
            (0..32)
                .map(|_| {
                    let mut out = Vec::new();
                    system.handle(&[tick()], &player, &view, &grid, &mut out);
                    out
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(rolls(behaviour()), rolls(behaviour()));
    }

    #[test]
    fn shot_hits_nearest_agent_in_crosshair() {
        let grid = GridMap::enclosed_room(12, 5);
        let view = AgentView::from_snapshots(vec![
            agent(0, AgentKind::Soldier, 8.5, 2.5),
            agent(1, AgentKind::Cacodemon, 5.5, 2.5),
            agent(2, AgentKind::Soldier, 3.5, 1.2),
        ]);
        let mut out = Vec::new();

        behaviour().handle(
            &[fired(WeaponKind::Shotgun)],
            &player_at(1.5, 2.5, 0.0),
            &view,
            &grid,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::HitAgent {
                agent: AgentId::new(1),
                damage: 70,
            }]
        );
    }

    #[test]
    fn knife_only_reaches_adjacent_agents() {
        let grid = GridMap::enclosed_room(12, 5);
        let view = AgentView::from_snapshots(vec![agent(0, AgentKind::Soldier, 5.5, 2.5)]);
        let mut out = Vec::new();

        behaviour().handle(
            &[fired(WeaponKind::Knife)],
            &player_at(1.5, 2.5, 0.0),
            &view,
            &grid,
            &mut out,
        );

        assert!(out.is_empty());
    }
}
