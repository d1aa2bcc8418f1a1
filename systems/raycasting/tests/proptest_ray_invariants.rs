//! Property-based invariants for the column ray caster.
//!
//! 1. Every ray terminates with a finite distance no greater than the depth
//!    limit, wherever the viewer stands (including far outside the grid).
//! 2. Texture offsets always lie in `[0, 1)`.
//! 3. Inside a closed room every ray strikes a wall.
//! 4. Casting is a pure function of its inputs.

use duskfall_core::{GridMap, Pose, Viewport};
use duskfall_system_raycasting::{depth_buffer, RayCaster};
use glam::Vec2;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const COLUMNS: u32 = 48;

fn caster(max_depth: u32) -> RayCaster {
    RayCaster::new(
        Viewport::new(480.0, 270.0, COLUMNS, 60.0_f32.to_radians()),
        max_depth,
    )
}

fn map_strategy() -> impl Strategy<Value = GridMap> {
    (2u32..=12, 2u32..=12).prop_flat_map(|(columns, rows)| {
        prop::collection::vec(prop::bool::weighted(0.3), (columns * rows) as usize).prop_map(
            move |walls| {
                let text: Vec<String> = walls
                    .chunks(columns as usize)
                    .map(|row| row.iter().map(|&wall| if wall { '1' } else { '.' }).collect())
                    .collect();
                GridMap::parse(&text.join("\n")).expect("generated map is well formed")
            },
        )
    })
}

fn pose_strategy() -> impl Strategy<Value = Pose> {
    (-4.0f32..16.0, -4.0f32..16.0, -10.0f32..10.0)
        .prop_map(|(x, y, angle)| Pose::new(Vec2::new(x, y), angle))
}

fn coordinate_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![-1.0e12f32..-1.0e3, 1.0e3f32..1.0e12, -4.0f32..16.0]
}

fn distant_pose_strategy() -> impl Strategy<Value = Pose> {
    (coordinate_strategy(), coordinate_strategy(), -10.0f32..10.0)
        .prop_filter("at least one coordinate far away", |(x, y, _)| {
            x.abs() >= 1.0e3 || y.abs() >= 1.0e3
        })
        .prop_map(|(x, y, angle)| Pose::new(Vec2::new(x, y), angle))
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Termination and texture range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rays_terminate_within_depth(
        grid in map_strategy(),
        pose in pose_strategy(),
        max_depth in 1u32..=24,
    ) {
        let hits = caster(max_depth).cast(&pose, &grid);

        prop_assert_eq!(hits.len(), COLUMNS as usize);
        for hit in &hits {
            prop_assert!(hit.distance.is_finite());
            prop_assert!(hit.euclidean <= max_depth as f32 + 1e-3,
                "column {} travelled {} past depth {}", hit.column, hit.euclidean, max_depth);
            prop_assert!((0.0..1.0).contains(&hit.texture_offset),
                "texture offset {} out of range", hit.texture_offset);
            prop_assert_eq!(hit.wall.is_some(), hit.cell.is_some());
        }
    }
}

proptest! {
    #[test]
    fn distant_viewers_see_nothing(
        grid in map_strategy(),
        pose in distant_pose_strategy(),
    ) {
        let hits = caster(24).cast(&pose, &grid);

        prop_assert_eq!(hits.len(), COLUMNS as usize);
        for hit in &hits {
            prop_assert!(!hit.is_hit(), "column {} hit a wall from {:?}", hit.column, pose);
            prop_assert_eq!(hit.euclidean, 24.0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Closed rooms are always hit
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enclosed_room_rays_always_hit(
        columns in 3u32..=12,
        rows in 3u32..=12,
        fx in 0.05f32..0.95,
        fy in 0.05f32..0.95,
        angle in -7.0f32..7.0,
    ) {
        let grid = GridMap::enclosed_room(columns, rows);
        let position = Vec2::new(
            1.0 + fx * (columns - 2) as f32,
            1.0 + fy * (rows - 2) as f32,
        );
        let hits = caster(24).cast(&Pose::new(position, angle), &grid);

        for hit in &hits {
            prop_assert!(hit.is_hit(), "column {} escaped the room", hit.column);
            prop_assert!(hit.distance > 0.0);
            prop_assert!(hit.distance <= hit.euclidean + 1e-4);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn casting_is_reproducible(grid in map_strategy(), pose in pose_strategy()) {
        let caster = caster(16);
        let first = caster.cast(&pose, &grid);
        let mut second = Vec::new();
        caster.cast_into(&pose, &grid, &mut second);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(depth_buffer(&first), depth_buffer(&second));
    }
}

#[test]
fn five_by_five_room_reports_one_and_a_half_cells_ahead() {
    let grid = GridMap::enclosed_room(5, 5);
    let pose = Pose::new(Vec2::new(2.5, 2.5), 0.0);
    let caster = caster(20);

    let hits = caster.cast(&pose, &grid);
    let centre = &hits[COLUMNS as usize / 2];

    assert!((centre.distance - 1.5).abs() < 1e-3);
    assert_eq!(hits, caster.cast(&pose, &grid));
}
