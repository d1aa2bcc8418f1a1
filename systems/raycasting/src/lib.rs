#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-column ray casting against the level grid.
//!
//! Rays march through the grid with a digital differential analyser: the
//! caster tracks the distance to the next vertical and horizontal grid line,
//! always advances across the nearer one and tests the cell it enters. The
//! walk never indexes outside the grid and gives up once the next crossing
//! lies beyond the configured maximum depth.

use duskfall_core::{CellCoord, GridMap, Pose, Viewport, WallId};
use glam::Vec2;

/// Offset added to distances before projecting to avoid dividing by zero.
const PROJECTION_EPSILON: f32 = 1e-4;

/// Face of a grid cell that a ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// The ray crossed a vertical grid line (a face perpendicular to x).
    Vertical,
    /// The ray crossed a horizontal grid line (a face perpendicular to y).
    Horizontal,
}

/// Wall cell struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallHit {
    /// Cell that holds the wall.
    pub cell: CellCoord,
    /// Texture identifier of the wall.
    pub wall: WallId,
}

/// Result of marching a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance travelled along the ray.
    pub euclidean: f32,
    /// Point where the ray stopped.
    pub point: Vec2,
    /// Face that was struck.
    pub side: WallSide,
    /// Horizontal texture coordinate in `[0, 1)`.
    pub texture_offset: f32,
    /// Struck wall, or `None` when the ray ran out of depth.
    pub hit: Option<WallHit>,
}

/// Ray cast for a single screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnHit {
    /// Screen column index.
    pub column: u32,
    /// Absolute angle of the ray in radians.
    pub ray_angle: f32,
    /// Distance projected onto the view axis, free of fish-eye distortion.
    pub distance: f32,
    /// Raw distance along the ray.
    pub euclidean: f32,
    /// Face that was struck.
    pub side: WallSide,
    /// Horizontal texture coordinate in `[0, 1)`.
    pub texture_offset: f32,
    /// Texture identifier of the struck wall, `None` for the depth sentinel.
    pub wall: Option<WallId>,
    /// Cell that holds the struck wall.
    pub cell: Option<CellCoord>,
    /// Height in pixels of the wall slice on screen.
    pub projected_height: f32,
}

impl ColumnHit {
    /// Reports whether the ray struck a wall.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.wall.is_some()
    }
}

/// Casts one ray per screen column.
#[derive(Clone, Copy, Debug)]
pub struct RayCaster {
    viewport: Viewport,
    max_depth: u32,
}

impl RayCaster {
    /// Creates a ray caster for the provided projection and depth limit.
    #[must_use]
    pub fn new(viewport: Viewport, max_depth: u32) -> Self {
        Self {
            viewport,
            max_depth: max_depth.max(1),
        }
    }

    /// Absolute angle of the ray for the provided column.
    #[must_use]
    pub fn ray_angle(&self, pose: &Pose, column: u32) -> f32 {
        pose.angle - self.viewport.half_fov()
            + (column as f32 + 0.5) * self.viewport.delta_angle()
    }

    /// Casts every column, returning one hit per column in screen order.
    #[must_use]
    pub fn cast(&self, pose: &Pose, grid: &GridMap) -> Vec<ColumnHit> {
        let mut hits = Vec::with_capacity(self.viewport.columns() as usize);
        self.cast_into(pose, grid, &mut hits);
        hits
    }

    /// Casts every column into a reusable buffer, replacing its contents.
    pub fn cast_into(&self, pose: &Pose, grid: &GridMap, out: &mut Vec<ColumnHit>) {
        out.clear();
        out.reserve(self.viewport.columns() as usize);

        let screen_distance = self.viewport.screen_distance();
        for column in 0..self.viewport.columns() {
            let ray_angle = self.ray_angle(pose, column);
            let ray = cast_ray(pose.position, ray_angle, grid, self.max_depth);
            let distance = match ray.hit {
                Some(_) => ray.euclidean * (ray_angle - pose.angle).cos(),
                None => ray.euclidean,
            };

            out.push(ColumnHit {
                column,
                ray_angle,
                distance,
                euclidean: ray.euclidean,
                side: ray.side,
                texture_offset: ray.texture_offset,
                wall: ray.hit.map(|hit| hit.wall),
                cell: ray.hit.map(|hit| hit.cell),
                projected_height: screen_distance / (distance + PROJECTION_EPSILON),
            });
        }
    }
}

/// Collects the per-column wall distances used to occlude sprites.
#[must_use]
pub fn depth_buffer(hits: &[ColumnHit]) -> Vec<f32> {
    hits.iter().map(|hit| hit.distance).collect()
}

/// Marches a single ray from `origin` along `angle`.
///
/// When no wall lies within `max_depth` the result is a sentinel whose
/// distance equals `max_depth` and whose `hit` is `None`.
#[must_use]
pub fn cast_ray(origin: Vec2, angle: f32, grid: &GridMap, max_depth: u32) -> RayHit {
    march(origin, angle, grid, max_depth as f32)
}

/// Reports whether the straight segment from `from` to `to` is free of walls.
///
/// Targets farther away than `max_depth` are never visible.
#[must_use]
pub fn has_line_of_sight(grid: &GridMap, from: Vec2, to: Vec2, max_depth: u32) -> bool {
    let delta = to - from;
    let length = delta.length();
    if length > max_depth as f32 {
        return false;
    }
    if CellCoord::containing(from) == CellCoord::containing(to) {
        return true;
    }

    let angle = delta.y.atan2(delta.x);
    let ray = march(from, angle, grid, length);
    ray.hit.is_none()
}

fn march(origin: Vec2, angle: f32, grid: &GridMap, limit: f32) -> RayHit {
    let direction = Vec2::new(angle.cos(), angle.sin());
    if !origin.is_finite() || !direction.is_finite() || distance_to_grid(origin, grid) > limit {
        return sentinel(origin, direction, limit);
    }
    let mut cell = CellCoord::containing(origin);

    let step_x = if direction.x < 0.0 { -1 } else { 1 };
    let step_y = if direction.y < 0.0 { -1 } else { 1 };
    let delta_x = (1.0 / direction.x).abs();
    let delta_y = (1.0 / direction.y).abs();

    let mut side_x = if direction.x == 0.0 {
        f32::INFINITY
    } else if step_x < 0 {
        (origin.x - cell.column() as f32) * delta_x
    } else {
        (cell.column() as f32 + 1.0 - origin.x) * delta_x
    };
    let mut side_y = if direction.y == 0.0 {
        f32::INFINITY
    } else if step_y < 0 {
        (origin.y - cell.row() as f32) * delta_y
    } else {
        (cell.row() as f32 + 1.0 - origin.y) * delta_y
    };

    let crossing_budget = (limit.ceil() as u32).saturating_mul(2).saturating_add(2);
    for _ in 0..crossing_budget {
        let (travelled, side) = if side_x < side_y {
            let travelled = side_x;
            side_x += delta_x;
            cell = cell.offset(step_x, 0);
            (travelled, WallSide::Vertical)
        } else {
            let travelled = side_y;
            side_y += delta_y;
            cell = cell.offset(0, step_y);
            (travelled, WallSide::Horizontal)
        };

        if !travelled.is_finite() || travelled > limit {
            break;
        }

        if let Some(wall) = grid.wall_at(cell) {
            let point = origin + direction * travelled;
            return RayHit {
                euclidean: travelled,
                point,
                side,
                texture_offset: texture_offset(point, direction, side),
                hit: Some(WallHit { cell, wall }),
            };
        }
    }

    sentinel(origin, direction, limit)
}

fn sentinel(origin: Vec2, direction: Vec2, limit: f32) -> RayHit {
    RayHit {
        euclidean: limit,
        point: origin + direction * limit,
        side: WallSide::Vertical,
        texture_offset: 0.0,
        hit: None,
    }
}

/// Distance from `point` to the nearest point of the grid's bounding box.
fn distance_to_grid(point: Vec2, grid: &GridMap) -> f32 {
    let max = Vec2::new(grid.columns() as f32, grid.rows() as f32);
    let outside = (Vec2::ZERO - point).max(point - max).max(Vec2::ZERO);
    outside.length()
}

fn texture_offset(point: Vec2, direction: Vec2, side: WallSide) -> f32 {
    match side {
        WallSide::Vertical => {
            let along = unit_fraction(point.y);
            if direction.x < 0.0 {
                unit_fraction(1.0 - along)
            } else {
                along
            }
        }
        WallSide::Horizontal => {
            let along = unit_fraction(point.x);
            if direction.y > 0.0 {
                unit_fraction(1.0 - along)
            } else {
                along
            }
        }
    }
}

fn unit_fraction(value: f32) -> f32 {
    let fraction = value - value.floor();
    if (0.0..1.0).contains(&fraction) {
        fraction
    } else {
        0.0
    }
}
