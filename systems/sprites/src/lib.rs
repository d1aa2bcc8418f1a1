#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sprite bookkeeping, projection and painter-ordered composition.
//!
//! [`SpriteRegistry`] owns the level's decorations and cycles their animation
//! frames. Each frame, [`project`] turns world-space sprites into screen-space
//! [`SpriteDraw`] values, discarding anything outside the field of view or
//! hidden behind walls, and [`compose`] merges the surviving sprites with the
//! wall columns into a single back-to-front draw list.

mod compose;
mod projection;

use std::time::Duration;

use duskfall_core::{AgentSnapshot, AgentState, Decoration, SpriteKey};
use glam::Vec2;

pub use compose::{compose, DrawItem};
pub use projection::{project, SpriteDraw, NEAR_CLIP};

/// Unique identifier assigned to a registered sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Creates a new sprite identifier with the provided numeric value.
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

/// Frame cycling parameters of an animated sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animation {
    /// Number of frames in the cycle.
    pub frames: u32,
    /// Time each frame stays on screen.
    pub frame_time: Duration,
}

/// Drawing characteristics shared by every sprite using an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProfile {
    /// Size relative to a wall slice at the same distance.
    pub scale: f32,
    /// Vertical offset relative to the projected height.
    pub height_shift: f32,
    /// Width divided by height of the image.
    pub aspect: f32,
    /// Frame cycling, `None` for static images.
    pub animation: Option<Animation>,
}

/// Looks up how the provided image is drawn.
#[must_use]
pub const fn profile(image: SpriteKey) -> SpriteProfile {
    match image {
        SpriteKey::Candelabra => SpriteProfile {
            scale: 0.7,
            height_shift: 0.27,
            aspect: 0.5,
            animation: None,
        },
        SpriteKey::GreenLight | SpriteKey::RedLight => SpriteProfile {
            scale: 0.8,
            height_shift: 0.16,
            aspect: 0.4,
            animation: Some(Animation {
                frames: 4,
                frame_time: Duration::from_millis(120),
            }),
        },
        SpriteKey::Soldier => agent_profile(0.6, 0.38, 0.6),
        SpriteKey::Cacodemon => agent_profile(0.7, 0.27, 1.0),
        SpriteKey::Cyberdemon => agent_profile(1.0, 0.04, 0.8),
    }
}

const fn agent_profile(scale: f32, height_shift: f32, aspect: f32) -> SpriteProfile {
    SpriteProfile {
        scale,
        height_shift,
        aspect,
        animation: None,
    }
}

/// A sprite placed in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteObject {
    /// Identifier of the sprite within its registry.
    pub id: SpriteId,
    /// Position in world units.
    pub position: Vec2,
    /// Image the sprite is drawn with.
    pub image: SpriteKey,
    /// Size relative to a wall slice at the same distance.
    pub scale: f32,
    /// Vertical offset relative to the projected height.
    pub height_shift: f32,
    /// Width divided by height of the image.
    pub aspect: f32,
    /// Frame currently shown.
    pub frame: u32,
    animation: Option<Animation>,
    elapsed: Duration,
}

impl SpriteObject {
    /// Creates a sprite drawn with the image's default profile.
    #[must_use]
    pub fn new(id: SpriteId, image: SpriteKey, position: Vec2) -> Self {
        let profile = profile(image);
        Self {
            id,
            position,
            image,
            scale: profile.scale,
            height_shift: profile.height_shift,
            aspect: profile.aspect,
            frame: 0,
            animation: profile.animation,
            elapsed: Duration::ZERO,
        }
    }

    /// Transient sprite describing an agent for the current frame.
    ///
    /// The frame index encodes the agent's behavioural state so backends can
    /// pick the matching pose.
    #[must_use]
    pub fn for_agent(snapshot: &AgentSnapshot) -> Self {
        let mut object = Self::new(
            SpriteId::new(snapshot.id.get()),
            snapshot.kind.sprite(),
            snapshot.position,
        );
        object.frame = match snapshot.state {
            AgentState::Idle => 0,
            AgentState::Chasing => 1,
            AgentState::Attacking => 2,
            AgentState::Pain => 3,
            AgentState::Dead => 4,
        };
        object
    }

    fn advance(&mut self, dt: Duration) {
        let Some(animation) = self.animation else {
            return;
        };
        if animation.frames == 0 || animation.frame_time.is_zero() {
            return;
        }

        self.elapsed += dt;
        let frame_nanos = animation.frame_time.as_nanos();
        let steps = self.elapsed.as_nanos() / frame_nanos;
        if steps == 0 {
            return;
        }

        let remainder = self.elapsed.as_nanos() % frame_nanos;
        self.elapsed = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
        let advance = u32::try_from(steps % u128::from(animation.frames)).unwrap_or(0);
        self.frame = (self.frame + advance) % animation.frames;
    }
}

/// Ordered collection of the level's sprites.
#[derive(Clone, Debug, Default)]
pub struct SpriteRegistry {
    objects: Vec<SpriteObject>,
    next_id: u32,
}

impl SpriteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding one sprite per decoration, in order.
    #[must_use]
    pub fn from_decorations(decorations: &[Decoration]) -> Self {
        let mut registry = Self::new();
        for decoration in decorations {
            let _ = registry.spawn(decoration.sprite, decoration.position);
        }
        registry
    }

    /// Adds a sprite with the image's default profile.
    pub fn spawn(&mut self, image: SpriteKey, position: Vec2) -> SpriteId {
        let id = SpriteId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.objects.push(SpriteObject::new(id, image, position));
        id
    }

    /// Advances every animated sprite by `dt`, wrapping at the end of its cycle.
    pub fn update(&mut self, dt: Duration) {
        for object in &mut self.objects {
            object.advance(dt);
        }
    }

    /// Sprites in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[SpriteObject] {
        &self.objects
    }

    /// Sprite with the provided identifier.
    #[must_use]
    pub fn get(&self, id: SpriteId) -> Option<&SpriteObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Number of registered sprites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Reports whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animated_frames_wrap_after_full_cycle() {
        let mut registry = SpriteRegistry::new();
        let id = registry.spawn(SpriteKey::GreenLight, Vec2::new(1.5, 1.5));

        registry.update(Duration::from_millis(119));
        assert_eq!(registry.get(id).map(|sprite| sprite.frame), Some(0));

        registry.update(Duration::from_millis(1));
        assert_eq!(registry.get(id).map(|sprite| sprite.frame), Some(1));

        registry.update(Duration::from_millis(360));
        assert_eq!(registry.get(id).map(|sprite| sprite.frame), Some(0));
    }

    #[test]
    fn large_steps_advance_several_frames() {
        let mut registry = SpriteRegistry::new();
        let id = registry.spawn(SpriteKey::RedLight, Vec2::ZERO);

        registry.update(Duration::from_millis(250));

        assert_eq!(registry.get(id).map(|sprite| sprite.frame), Some(2));
    }

    #[test]
    fn static_sprites_never_change_frame() {
        let mut registry = SpriteRegistry::new();
        let id = registry.spawn(SpriteKey::Candelabra, Vec2::ZERO);

        registry.update(Duration::from_secs(5));

        assert_eq!(registry.get(id).map(|sprite| sprite.frame), Some(0));
        assert!(profile(SpriteKey::Candelabra).animation.is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn decorations_keep_their_order() {
        let registry = SpriteRegistry::from_decorations(&[
            Decoration {
                sprite: SpriteKey::RedLight,
                position: Vec2::new(2.0, 2.0),
            },
            Decoration {
                sprite: SpriteKey::Candelabra,
                position: Vec2::new(3.0, 2.0),
            },
        ]);

        let images: Vec<_> = registry.objects().iter().map(|object| object.image).collect();
        assert_eq!(images, vec![SpriteKey::RedLight, SpriteKey::Candelabra]);
        assert_eq!(registry.objects()[1].id, SpriteId::new(1));
    }
}
