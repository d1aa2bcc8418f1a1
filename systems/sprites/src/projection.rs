use duskfall_core::{signed_angle, Pose, SpriteKey, Viewport};
use glam::Vec2;

use crate::SpriteObject;

/// Sprites closer than this distance along the view axis are not drawn.
pub const NEAR_CLIP: f32 = 0.5;

/// Screen-space placement of a visible sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Horizontal centre of the sprite in pixels.
    pub screen_x: f32,
    /// Width and height in pixels.
    pub size: Vec2,
    /// Distance along the view axis.
    pub depth: f32,
    /// Image to draw.
    pub image: SpriteKey,
    /// Frame of the image to draw.
    pub frame: u32,
    /// Vertical offset relative to the projected height.
    pub height_shift: f32,
}

impl SpriteDraw {
    /// Left edge in pixels.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.screen_x - self.size.x * 0.5
    }

    /// Top edge in pixels for a surface of the provided height.
    #[must_use]
    pub fn top(&self, screen_height: f32) -> f32 {
        let projected = self.size.y;
        screen_height * 0.5 - projected * 0.5 + self.height_shift * projected
    }
}

/// Projects sprites into screen space.
///
/// Sprites outside the field of view (allowing half an image of slack on
/// either side), closer than [`NEAR_CLIP`], or behind the wall in every
/// column they cover are dropped. The result is ordered back to front; equal
/// depths keep the order of `objects`.
#[must_use]
pub fn project(
    objects: &[SpriteObject],
    pose: &Pose,
    viewport: &Viewport,
    depth_buffer: &[f32],
) -> Vec<SpriteDraw> {
    let mut draws: Vec<SpriteDraw> = objects
        .iter()
        .filter_map(|object| project_one(object, pose, viewport, depth_buffer))
        .collect();
    draws.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    draws
}

fn project_one(
    object: &SpriteObject,
    pose: &Pose,
    viewport: &Viewport,
    depth_buffer: &[f32],
) -> Option<SpriteDraw> {
    let offset = object.position - pose.position;
    let delta = signed_angle(offset.y.atan2(offset.x) - pose.angle);
    let depth = offset.length() * delta.cos();
    if depth <= NEAR_CLIP {
        return None;
    }

    let column_width = viewport.column_width();
    let screen_x =
        (viewport.columns() as f32 * 0.5 + delta / viewport.delta_angle()) * column_width;

    let height = viewport.screen_distance() / depth * object.scale;
    let width = height * object.aspect;
    let half_width = width * 0.5;
    if screen_x <= -half_width || screen_x >= viewport.width() + half_width {
        return None;
    }

    if occluded(screen_x - half_width, screen_x + half_width, depth, column_width, depth_buffer) {
        return None;
    }

    Some(SpriteDraw {
        screen_x,
        size: Vec2::new(width, height),
        depth,
        image: object.image,
        frame: object.frame,
        height_shift: object.height_shift,
    })
}

fn occluded(left: f32, right: f32, depth: f32, column_width: f32, depth_buffer: &[f32]) -> bool {
    if depth_buffer.is_empty() {
        return false;
    }

    let last = depth_buffer.len() - 1;
    let first_column = (left / column_width).floor().max(0.0) as usize;
    let last_column = ((right / column_width).ceil().max(0.0) as usize).min(last);
    if first_column > last_column {
        return false;
    }

    depth_buffer[first_column..=last_column]
        .iter()
        .all(|wall| *wall < depth)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::{SpriteId, SpriteRegistry};

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 100, 60.0_f32.to_radians())
    }

    fn sprite(id: u32, position: Vec2) -> SpriteObject {
        SpriteObject::new(SpriteId::new(id), SpriteKey::Candelabra, position)
    }

    #[test]
    fn sprite_straight_ahead_lands_on_screen_centre() {
        let pose = Pose::new(Vec2::new(1.5, 1.5), 0.0);
        let draws = project(&[sprite(0, Vec2::new(4.5, 1.5))], &pose, &viewport(), &[]);

        assert_eq!(draws.len(), 1);
        assert!((draws[0].screen_x - 400.0).abs() < 1e-3);
        assert!((draws[0].depth - 3.0).abs() < 1e-5);
    }

    #[test]
    fn sprites_behind_or_too_close_are_culled() {
        let pose = Pose::new(Vec2::new(5.0, 5.0), 0.0);
        let objects = [
            sprite(0, Vec2::new(2.0, 5.0)),
            sprite(1, Vec2::new(5.3, 5.0)),
            sprite(2, Vec2::new(5.0, 9.0)),
        ];

        assert!(project(&objects, &pose, &viewport(), &[]).is_empty());
    }

    #[test]
    fn sprites_fully_behind_walls_are_hidden() {
        let pose = Pose::new(Vec2::new(1.5, 1.5), 0.0);
        let objects = [sprite(0, Vec2::new(6.5, 1.5))];

        let walls_near = vec![2.0; 100];
        let walls_far = vec![10.0; 100];

        assert!(project(&objects, &pose, &viewport(), &walls_near).is_empty());
        assert_eq!(project(&objects, &pose, &viewport(), &walls_far).len(), 1);
    }

    #[test]
    fn partially_visible_sprite_is_kept() {
        let pose = Pose::new(Vec2::new(1.5, 1.5), 0.0);
        let objects = [sprite(0, Vec2::new(4.5, 1.5))];
        let mut depths = vec![1.0; 100];
        depths[50] = 8.0;

        assert_eq!(project(&objects, &pose, &viewport(), &depths).len(), 1);
    }

    #[test]
    fn draws_are_sorted_back_to_front_with_stable_ties() {
        let pose = Pose::new(Vec2::new(1.5, 5.0), 0.0);
        let mut registry = SpriteRegistry::new();
        let near = registry.spawn(SpriteKey::GreenLight, Vec2::new(3.5, 5.0));
        let _ = registry.spawn(SpriteKey::Candelabra, Vec2::new(7.5, 5.0));
        let _ = registry.spawn(SpriteKey::RedLight, Vec2::new(7.5, 5.0));

        let draws = project(registry.objects(), &pose, &viewport(), &[]);
        let images: Vec<_> = draws.iter().map(|draw| draw.image).collect();

        assert_eq!(
            images,
            vec![SpriteKey::Candelabra, SpriteKey::RedLight, SpriteKey::GreenLight]
        );
        assert_eq!(registry.get(near).map(|object| object.image), Some(SpriteKey::GreenLight));
    }

    #[test]
    fn sprite_to_the_side_of_a_rotated_view_is_visible() {
        let pose = Pose::new(Vec2::new(3.0, 3.0), FRAC_PI_2);
        let draws = project(&[sprite(0, Vec2::new(3.0, 6.0))], &pose, &viewport(), &[]);

        assert_eq!(draws.len(), 1);
        assert!((draws[0].screen_x - 400.0).abs() < 1e-2);
    }
}
