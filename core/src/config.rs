//! Tunable engine parameters loaded from TOML.

use std::{f32::consts::PI, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// A value parsed correctly but is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: &'static str,
    },
}

/// Root configuration for a game session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical screen and column resolution.
    pub viewport: ViewportConfig,
    /// Ray casting limits.
    pub raycasting: RayCastingConfig,
    /// Player start pose, speeds and health.
    pub player: PlayerConfig,
    /// Non-player agent settings.
    pub agents: AgentConfig,
}

impl GameConfig {
    /// Parses and validates a TOML document. Missing sections use defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid {
                field: "viewport",
                reason: "width and height must be positive",
            });
        }
        if self.viewport.columns == 0 || self.viewport.columns > self.viewport.width {
            return Err(ConfigError::Invalid {
                field: "viewport.columns",
                reason: "must be between 1 and the viewport width",
            });
        }
        if !(self.raycasting.fov_degrees > 0.0 && self.raycasting.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid {
                field: "raycasting.fov_degrees",
                reason: "must lie strictly between 0 and 180",
            });
        }
        if self.raycasting.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "raycasting.max_depth",
                reason: "must be positive",
            });
        }
        if self.player.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "player.max_health",
                reason: "must be positive",
            });
        }
        if self.player.speed < 0.0 || self.player.rotation_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "player",
                reason: "speeds must not be negative",
            });
        }
        if self.player.collision_margin < 0.0 || self.player.collision_margin >= 0.5 {
            return Err(ConfigError::Invalid {
                field: "player.collision_margin",
                reason: "must lie in 0.0..0.5",
            });
        }
        Ok(())
    }

    /// Projection parameters derived from the viewport and ray casting sections.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.viewport.width as f32,
            self.viewport.height as f32,
            self.viewport.columns,
            self.raycasting.fov_degrees.to_radians(),
        )
    }
}

/// Logical screen resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    /// Width of the render surface in pixels.
    pub width: u32,
    /// Height of the render surface in pixels.
    pub height: u32,
    /// Number of rays cast per frame; each covers `width / columns` pixels.
    pub columns: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            columns: 800,
        }
    }
}

/// Ray casting limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RayCastingConfig {
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// Farthest distance in cells a ray travels before reporting no wall.
    pub max_depth: u32,
}

impl Default for RayCastingConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            max_depth: 20,
        }
    }
}

/// Player start pose and movement tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Starting column position in world units.
    pub start_x: f32,
    /// Starting row position in world units.
    pub start_y: f32,
    /// Starting view angle in radians.
    pub start_angle: f32,
    /// Walking speed in cells per second.
    pub speed: f32,
    /// Turning speed in radians per second used by keyboard adapters.
    pub rotation_speed: f32,
    /// Distance kept between the player and a wall along the direction of travel.
    pub collision_margin: f32,
    /// Health the player starts with and regenerates towards.
    pub max_health: u32,
    /// Time that must elapse for each point of health regenerated.
    pub recovery_interval_ms: u64,
    /// Minimum time between two accepted weapon switch requests.
    pub weapon_switch_cooldown_ms: u64,
}

impl PlayerConfig {
    /// Starting position as a vector.
    #[must_use]
    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    /// Health regeneration cadence.
    #[must_use]
    pub fn recovery_interval(&self) -> Duration {
        Duration::from_millis(self.recovery_interval_ms)
    }

    /// Weapon switch debounce window.
    #[must_use]
    pub fn weapon_switch_cooldown(&self) -> Duration {
        Duration::from_millis(self.weapon_switch_cooldown_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_x: 1.5,
            start_y: 5.0,
            start_angle: 0.0,
            speed: 4.0,
            rotation_speed: 2.0,
            collision_margin: 0.24,
            max_health: 100,
            recovery_interval_ms: 30,
            weapon_switch_cooldown_ms: 300,
        }
    }
}

/// Settings for the non-player agents of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Whether the level's agents are spawned at all.
    pub enabled: bool,
    /// Seed for the agents' attack rolls.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 0x5eed_da5c_0ff3_e000,
        }
    }
}

/// Projection parameters shared by the ray caster and the sprite compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    columns: u32,
    fov: f32,
}

impl Viewport {
    /// Creates a viewport; the column count is raised to at least one and the
    /// field of view is clamped below a half turn.
    #[must_use]
    pub fn new(width: f32, height: f32, columns: u32, fov: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            columns: columns.max(1),
            fov: fov.clamp(f32::EPSILON, PI - f32::EPSILON),
        }
    }

    /// Width of the render surface in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the render surface in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Number of ray columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    /// Half of the field of view in radians.
    #[must_use]
    pub fn half_fov(&self) -> f32 {
        self.fov * 0.5
    }

    /// Angle between two adjacent rays.
    #[must_use]
    pub fn delta_angle(&self) -> f32 {
        self.fov / self.columns as f32
    }

    /// Distance from the eye to the projection plane, in pixels.
    #[must_use]
    pub fn screen_distance(&self) -> f32 {
        self.width * 0.5 / self.half_fov().tan()
    }

    /// Width in pixels covered by one ray column.
    #[must_use]
    pub fn column_width(&self) -> f32 {
        self.width / self.columns as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        GameConfig::default().viewport()
    }
}
