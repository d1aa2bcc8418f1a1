#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Duskfall adapters.

use anyhow::Result as AnyResult;
use duskfall_core::{Ammo, GameStatus, Intent, SpriteKey, WallId, WeaponKind};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Flat palette standing in for wall textures.
#[must_use]
pub fn wall_color(wall: WallId) -> Color {
    match wall.get() {
        1 => Color::from_rgb_u8(120, 120, 128),
        2 => Color::from_rgb_u8(150, 90, 60),
        3 => Color::from_rgb_u8(70, 110, 70),
        4 => Color::from_rgb_u8(90, 80, 140),
        5 => Color::from_rgb_u8(160, 140, 70),
        6 => Color::from_rgb_u8(140, 60, 60),
        7 => Color::from_rgb_u8(60, 120, 130),
        8 => Color::from_rgb_u8(110, 110, 60),
        _ => Color::from_rgb_u8(100, 100, 100),
    }
}

/// Flat palette standing in for sprite sheets.
#[must_use]
pub fn sprite_color(image: SpriteKey) -> Color {
    match image {
        SpriteKey::Candelabra => Color::from_rgb_u8(220, 190, 90),
        SpriteKey::GreenLight => Color::from_rgb_u8(90, 220, 110),
        SpriteKey::RedLight => Color::from_rgb_u8(230, 80, 70),
        SpriteKey::Soldier => Color::from_rgb_u8(150, 130, 100),
        SpriteKey::Cacodemon => Color::from_rgb_u8(200, 50, 60),
        SpriteKey::Cyberdemon => Color::from_rgb_u8(120, 90, 80),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Forward movement key held.
    pub forward: bool,
    /// Backward movement key held.
    pub backward: bool,
    /// Strafe-left key held.
    pub strafe_left: bool,
    /// Strafe-right key held.
    pub strafe_right: bool,
    /// Turn-left key held.
    pub turn_left: bool,
    /// Turn-right key held.
    pub turn_right: bool,
    /// Fire key pressed on this frame.
    pub fire: bool,
    /// Weapon switch key pressed on this frame.
    pub switch_weapon: bool,
    /// Restart key pressed on this frame.
    pub restart: bool,
}

impl FrameInput {
    /// Converts held and pressed keys into an intent. `turn` is the rotation
    /// in radians a held turn key produces for this frame.
    #[must_use]
    pub fn intent(&self, turn: f32) -> Intent {
        Intent {
            move_vector: Vec2::new(
                axis(self.forward, self.backward),
                axis(self.strafe_right, self.strafe_left),
            ),
            rotate_delta: axis(self.turn_right, self.turn_left) * turn,
            fire: self.fire,
            switch_weapon: self.switch_weapon,
            restart: self.restart,
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// One projected wall slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Left edge in pixels.
    pub left: f32,
    /// Slice width in pixels.
    pub width: f32,
    /// Projected slice height in pixels, centred on the horizon.
    pub height: f32,
    /// Perpendicular distance used for painter ordering and fog.
    pub depth: f32,
    /// Wall texture the slice samples.
    pub wall: WallId,
    /// Horizontal texture coordinate in `0.0..1.0`.
    pub texture_offset: f32,
    /// Whether the slice belongs to a north or south facing wall.
    pub shaded: bool,
}

impl WallColumn {
    /// Top edge in pixels for a screen of the given height.
    #[must_use]
    pub fn top(&self, screen_height: f32) -> f32 {
        (screen_height - self.height) * 0.5
    }
}

/// One projected sprite image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Top-left corner in pixels.
    pub origin: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
    /// Perpendicular distance used for painter ordering.
    pub depth: f32,
    /// Sprite sheet.
    pub image: SpriteKey,
    /// Frame within the sheet.
    pub frame: u32,
}

/// Scene element in painter order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneDraw {
    /// Wall slice.
    Wall(WallColumn),
    /// Sprite image.
    Sprite(SceneSprite),
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Current player health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Points collected so far.
    pub score: u32,
    /// Weapon in hand.
    pub weapon: WeaponKind,
    /// Rounds left for the weapon in hand.
    pub ammo: Ammo,
    /// Animation frame of the weapon in hand.
    pub weapon_frame: u32,
    /// Strength of the red damage overlay in `0.0..=1.0`.
    pub damage_flash: f32,
    /// Whether the session is still running.
    pub status: GameStatus,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            health: 0,
            max_health: 0,
            score: 0,
            weapon: WeaponKind::Shotgun,
            ammo: WeaponKind::Shotgun.spec().max_ammo,
            weapon_frame: 0,
            damage_flash: 0.0,
            status: GameStatus::Playing,
        }
    }
}

/// Everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Screen width in pixels.
    pub width: f32,
    /// Screen height in pixels.
    pub height: f32,
    /// Wall slices and sprites ordered back to front.
    pub draws: Vec<SceneDraw>,
    /// Overlay values.
    pub hud: Hud,
}

impl Scene {
    /// Creates an empty scene for a screen of the given size.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidScreen { width, height });
        }

        Ok(Self {
            width,
            height,
            draws: Vec::new(),
            hud: Hud::default(),
        })
    }

    /// Vertical position of the horizon.
    #[must_use]
    pub fn horizon(&self) -> f32 {
        self.height * 0.5
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Ceiling color; the floor is drawn a shade darker.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Duskfall scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and rebuilds the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Screen dimensions must be positive.
    InvalidScreen {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScreen { width, height } => {
                write!(
                    f,
                    "screen dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_creation_rejects_degenerate_screens() {
        let error = Scene::new(0.0, 600.0).expect_err("zero width must be rejected");

        assert!(matches!(
            error,
            RenderingError::InvalidScreen { width, .. } if width == 0.0
        ));
        assert!(Scene::new(f32::NAN, 10.0).is_err());
    }

    #[test]
    fn scene_starts_empty_with_centred_horizon() {
        let scene = Scene::new(800.0, 600.0).expect("valid screen");

        assert!(scene.draws.is_empty());
        assert_eq!(scene.horizon(), 300.0);
        assert_eq!(scene.hud.status, GameStatus::Playing);
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = FrameInput {
            forward: true,
            backward: true,
            strafe_right: true,
            turn_left: true,
            ..FrameInput::default()
        };

        let intent = input.intent(0.5);

        assert_eq!(intent.move_vector, Vec2::new(0.0, 1.0));
        assert_eq!(intent.rotate_delta, -0.5);
    }

    #[test]
    fn untouched_keys_produce_idle_intent() {
        assert!(FrameInput::default().intent(0.1).is_idle());
    }

    #[test]
    fn wall_column_is_centred_on_horizon() {
        let column = WallColumn {
            left: 0.0,
            width: 2.0,
            height: 200.0,
            depth: 3.0,
            wall: WallId::new(1).expect("non-zero id"),
            texture_offset: 0.5,
            shaded: false,
        };

        assert_eq!(column.top(600.0), 200.0);
    }

    #[test]
    fn darken_and_lighten_move_towards_extremes() {
        let grey = Color::new(0.5, 0.5, 0.5, 1.0);

        assert_eq!(grey.darken(1.0), Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(grey.lighten(1.0), Color::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(grey.with_alpha(0.25).alpha, 0.25);
    }
}
