//! Player avatar: pose, collision, health and score.

use std::{f32::consts::FRAC_1_SQRT_2, time::Duration};

use duskfall_core::{wrap_angle, CellCoord, GridMap, PlayerConfig, PlayerSnapshot, Pose};
use glam::Vec2;

/// Converts a local `(forward, strafe)` request into a world displacement.
///
/// Each component is clamped to `-1.0..=1.0`. Positive strafe moves to the
/// right of the view direction. Diagonal input is scaled by `1/√2` so moving
/// diagonally is not faster than moving straight.
#[must_use]
pub fn motion_from_local(local: Vec2, angle: f32, distance: f32) -> Vec2 {
    let forward_amount = local.x.clamp(-1.0, 1.0);
    let strafe_amount = local.y.clamp(-1.0, 1.0);

    let forward = Vec2::new(angle.cos(), angle.sin());
    let right = Vec2::new(-angle.sin(), angle.cos());
    let mut motion = (forward * forward_amount + right * strafe_amount) * distance;
    if forward_amount != 0.0 && strafe_amount != 0.0 {
        motion *= FRAC_1_SQRT_2;
    }
    motion
}

/// Authoritative player state.
#[derive(Clone, Debug)]
pub struct Player {
    position: Vec2,
    angle: f32,
    health: u32,
    max_health: u32,
    score: u32,
    shot: bool,
    collision_margin: f32,
    recovery_interval: Duration,
    recovery_elapsed: Duration,
}

impl Player {
    /// Creates a player at the configured start pose with full health.
    #[must_use]
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: config.start_position(),
            angle: wrap_angle(config.start_angle),
            health: config.max_health,
            max_health: config.max_health,
            score: 0,
            shot: false,
            collision_margin: config.collision_margin,
            recovery_interval: config.recovery_interval(),
            recovery_elapsed: Duration::ZERO,
        }
    }

    /// Position and facing.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose::new(self.position, self.angle)
    }

    /// Health remaining.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Score accumulated this session.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Reports whether health has dropped below one point.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health < 1
    }

    /// Captures the player for read-only consumers.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            pose: self.pose(),
            health: self.health,
            max_health: self.max_health,
            score: self.score,
            shot: self.shot,
        }
    }

    /// Rotates by `rotation`, then moves by `motion` one axis at a time.
    ///
    /// Each axis is applied only when the cell reached by the move plus the
    /// collision margin, in the direction of travel, is walkable. Blocking one
    /// axis therefore lets the player slide along the wall on the other.
    pub fn apply_intent(&mut self, motion: Vec2, rotation: f32, grid: &GridMap) {
        if rotation.is_finite() {
            self.angle = wrap_angle(self.angle + rotation);
        }
        if !motion.is_finite() {
            return;
        }

        if motion.x != 0.0 {
            let probe = Vec2::new(
                self.position.x + motion.x + motion.x.signum() * self.collision_margin,
                self.position.y,
            );
            if grid.is_walkable(CellCoord::containing(probe)) {
                self.position.x += motion.x;
            }
        }

        if motion.y != 0.0 {
            let probe = Vec2::new(
                self.position.x,
                self.position.y + motion.y + motion.y.signum() * self.collision_margin,
            );
            if grid.is_walkable(CellCoord::containing(probe)) {
                self.position.y += motion.y;
            }
        }
    }

    /// Regenerates one point per elapsed recovery interval, never beyond the
    /// maximum. Returns `true` when health changed.
    pub fn recover_health(&mut self, dt: Duration) -> bool {
        if self.health >= self.max_health {
            self.recovery_elapsed = Duration::ZERO;
            return false;
        }
        if self.recovery_interval.is_zero() {
            self.health = self.max_health;
            return true;
        }

        self.recovery_elapsed += dt;
        let interval = self.recovery_interval.as_nanos();
        let gained = self.recovery_elapsed.as_nanos() / interval;
        if gained == 0 {
            return false;
        }

        let remainder = self.recovery_elapsed.as_nanos() % interval;
        self.recovery_elapsed = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
        let gained = u32::try_from(gained).unwrap_or(u32::MAX);
        self.health = self.health.saturating_add(gained).min(self.max_health);
        true
    }

    /// Removes health, saturating at zero, and returns the health left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn set_shot(&mut self, shot: bool) {
        self.shot = shot;
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(&PlayerConfig {
            start_x: x,
            start_y: y,
            ..PlayerConfig::default()
        })
    }

    #[test]
    fn diagonal_input_is_normalised() {
        let straight = motion_from_local(Vec2::new(1.0, 0.0), 0.0, 1.0);
        let diagonal = motion_from_local(Vec2::new(1.0, 1.0), 0.0, 1.0);

        assert!((straight - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((diagonal.length() - 1.0).abs() < 1e-5);
        assert!(diagonal.x > 0.0 && diagonal.y > 0.0);
    }

    #[test]
    fn strafing_right_moves_perpendicular_to_view() {
        let motion = motion_from_local(Vec2::new(0.0, 1.0), FRAC_PI_2, 2.0);

        assert!((motion - Vec2::new(-2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_wraps_into_one_turn() {
        let grid = GridMap::enclosed_room(5, 5);
        let mut player = player_at(2.5, 2.5);

        player.apply_intent(Vec2::ZERO, -FRAC_PI_2, &grid);

        assert!((player.pose().angle - 3.0 * FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn blocked_axis_slides_along_wall() {
        let grid = GridMap::enclosed_room(5, 5);
        let mut player = player_at(3.6, 2.0);

        player.apply_intent(Vec2::new(0.2, 0.3), 0.0, &grid);

        let position = player.pose().position;
        assert_eq!(position.x, 3.6);
        assert!((position.y - 2.3).abs() < 1e-6);
    }

    #[test]
    fn health_regenerates_one_point_per_interval() {
        let mut player = player_at(2.5, 2.5);
        let _ = player.take_damage(10);

        assert!(!player.recover_health(Duration::from_millis(29)));
        assert!(player.recover_health(Duration::from_millis(1)));
        assert_eq!(player.health(), 91);

        assert!(player.recover_health(Duration::from_millis(90)));
        assert_eq!(player.health(), 94);

        assert!(player.recover_health(Duration::from_secs(10)));
        assert_eq!(player.health(), 100);
        assert!(!player.recover_health(Duration::from_secs(1)));
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut player = player_at(2.5, 2.5);

        assert_eq!(player.take_damage(250), 0);
        assert!(player.is_dead());
    }
}
