//! Hostile agent state owned by the world.

use std::time::Duration;

use duskfall_core::{AgentId, AgentKind, AgentSnapshot, AgentState, CellCoord, GridMap};
use glam::Vec2;

/// Result of applying weapon damage to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HitOutcome {
    Hurt { health: u32 },
    Killed { points: u32 },
}

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) kind: AgentKind,
    pub(crate) position: Vec2,
    health: u32,
    state: AgentState,
    search_triggered: bool,
    heading: Option<CellCoord>,
    cooldown: Duration,
    pain: Duration,
}

impl Agent {
    pub(crate) fn new(id: AgentId, kind: AgentKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            health: kind.spec().health,
            state: AgentState::Idle,
            search_triggered: false,
            heading: None,
            cooldown: Duration::ZERO,
            pain: Duration::ZERO,
        }
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            state: self.state,
            search_triggered: self.search_triggered,
            ready_to_attack: self.cooldown.is_zero(),
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        CellCoord::containing(self.position)
    }

    /// Cells other agents must keep out of: the one the agent stands in and
    /// the one it is walking into.
    pub(crate) fn claimed_cells(&self) -> impl Iterator<Item = CellCoord> {
        std::iter::once(self.cell()).chain(self.heading)
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state != AgentState::Dead
    }

    /// Agents act only while alive and not reeling from a hit.
    pub(crate) fn can_act(&self) -> bool {
        !matches!(self.state, AgentState::Dead | AgentState::Pain)
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        if !self.is_alive() {
            return;
        }

        self.cooldown = self.cooldown.saturating_sub(dt);
        if self.state == AgentState::Pain {
            self.pain = self.pain.saturating_sub(dt);
            if self.pain.is_zero() {
                self.state = if self.search_triggered {
                    AgentState::Chasing
                } else {
                    AgentState::Idle
                };
            }
        }
    }

    /// Walks up to `step` toward the centre of `toward`, one axis at a time.
    pub(crate) fn advance(
        &mut self,
        toward: CellCoord,
        step: f32,
        grid: &GridMap,
        is_taken: impl Fn(CellCoord) -> bool,
    ) -> bool {
        self.search_triggered = true;
        self.state = AgentState::Chasing;

        self.heading = None;
        if is_taken(toward) || !grid.is_walkable(toward) {
            return false;
        }

        let offset = toward.center() - self.position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return false;
        }
        let motion = offset * (step.max(0.0).min(distance) / distance);

        let before = self.position;
        let next_x = Vec2::new(self.position.x + motion.x, self.position.y);
        if grid.is_walkable(CellCoord::containing(next_x)) {
            self.position = next_x;
        }
        let next_y = Vec2::new(self.position.x, self.position.y + motion.y);
        if grid.is_walkable(CellCoord::containing(next_y)) {
            self.position = next_y;
        }

        let moved = self.position != before;
        if moved {
            self.heading = Some(toward);
        }
        moved
    }

    pub(crate) fn attack(&mut self) -> bool {
        if !self.can_act() || !self.cooldown.is_zero() {
            return false;
        }

        self.search_triggered = true;
        self.heading = None;
        self.state = AgentState::Attacking;
        self.cooldown = self.kind.spec().attack_cooldown;
        true
    }

    pub(crate) fn hit(&mut self, damage: u32) -> Option<HitOutcome> {
        if !self.is_alive() {
            return None;
        }

        self.search_triggered = true;
        self.heading = None;
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.state = AgentState::Dead;
            return Some(HitOutcome::Killed {
                points: self.kind.spec().points,
            });
        }

        self.state = AgentState::Pain;
        self.pain = self.kind.spec().pain_duration;
        Some(HitOutcome::Hurt {
            health: self.health,
        })
    }
}
