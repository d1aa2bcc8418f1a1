//! Property-based invariants for the breadth-first path finder.
//!
//! 1. Route length equals the shortest hop distance computed by an
//!    independent relaxation over the whole grid, for both neighbourhoods.
//! 2. `NoPath` is reported exactly when the goal is unreachable.
//! 3. Every step is a legal move: one cell, onto a free cell, and diagonals
//!    never squeeze between two walls.

use duskfall_core::{CellCoord, GridMap};
use duskfall_system_pathfinding::{find_path, Connectivity, PathFinder, PathResult};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn scenario_strategy() -> impl Strategy<Value = (GridMap, CellCoord, CellCoord)> {
    (2u32..=10, 2u32..=10).prop_flat_map(|(columns, rows)| {
        (
            prop::collection::vec(prop::bool::weighted(0.35), (columns * rows) as usize),
            0..columns as i32,
            0..rows as i32,
            0..columns as i32,
            0..rows as i32,
        )
            .prop_map(move |(walls, sx, sy, gx, gy)| {
                let text: Vec<String> = walls
                    .chunks(columns as usize)
                    .map(|row| row.iter().map(|&wall| if wall { '#' } else { '.' }).collect())
                    .collect();
                let grid = GridMap::parse(&text.join("\n")).expect("generated map is well formed");
                (grid, CellCoord::new(sx, sy), CellCoord::new(gx, gy))
            })
    })
}

fn legal_move(grid: &GridMap, from: CellCoord, to: CellCoord, diagonals: bool) -> bool {
    let dx = to.column() - from.column();
    let dy = to.row() - from.row();
    if !grid.is_walkable(to) || dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
        return false;
    }
    if dx != 0 && dy != 0 {
        return diagonals
            && grid.is_walkable(from.offset(dx, 0))
            && grid.is_walkable(from.offset(0, dy));
    }
    true
}

/// Shortest hop count found by relaxing every cell until nothing improves.
fn reference_distance(
    grid: &GridMap,
    start: CellCoord,
    goal: CellCoord,
    diagonals: bool,
) -> Option<usize> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }

    let cells: Vec<CellCoord> = (0..grid.cell_count())
        .filter_map(|index| grid.cell_at(index))
        .collect();
    let mut distance: Vec<Option<usize>> = vec![None; cells.len()];
    distance[grid.index(start)?] = Some(0);

    let mut changed = true;
    while changed {
        changed = false;
        for (index, &cell) in cells.iter().enumerate() {
            let Some(here) = distance[index] else {
                continue;
            };
            for &neighbour in &cells {
                if !legal_move(grid, cell, neighbour, diagonals) {
                    continue;
                }
                let Some(slot) = grid.index(neighbour) else {
                    continue;
                };
                if distance[slot].map_or(true, |known| here + 1 < known) {
                    distance[slot] = Some(here + 1);
                    changed = true;
                }
            }
        }
    }

    distance[grid.index(goal)?]
}

fn check_route(
    grid: &GridMap,
    start: CellCoord,
    goal: CellCoord,
    result: &PathResult,
    diagonals: bool,
) -> Result<(), TestCaseError> {
    let expected = reference_distance(grid, start, goal, diagonals);
    prop_assert_eq!(result.hops(), expected);

    if let PathResult::Found(route) = result {
        prop_assert_eq!(route.is_empty(), start == goal);
        if let Some(last) = route.last() {
            prop_assert_eq!(*last, goal);
        }
        let mut previous = start;
        for &cell in route {
            prop_assert!(
                legal_move(grid, previous, cell, diagonals),
                "illegal step {:?} -> {:?}",
                previous,
                cell
            );
            previous = cell;
        }
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2 + 3. Eight-connected routes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn eight_connected_routes_are_shortest_and_legal(
        (grid, start, goal) in scenario_strategy(),
    ) {
        let result = find_path(start, goal, &grid);
        check_route(&grid, start, goal, &result, true)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2 + 3. Four-connected routes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn four_connected_routes_are_shortest_and_legal(
        (grid, start, goal) in scenario_strategy(),
    ) {
        let result = PathFinder::new(Connectivity::Four).find_path(start, goal, &grid);
        check_route(&grid, start, goal, &result, false)?;
    }
}
