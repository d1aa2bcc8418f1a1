#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first shortest path search over the level grid.
//!
//! The search is stateless: every call allocates its own frontier and parent
//! table, so any number of agents may route through the same [`GridMap`]
//! concurrently and identical inputs always produce identical routes.

use std::collections::VecDeque;

use duskfall_core::{CellCoord, GridMap};

/// Outcome of a path query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// Cells to visit in order. The start cell is excluded and the goal is the
    /// final entry; the route is empty when start and goal coincide.
    Found(Vec<CellCoord>),
    /// The goal cannot be reached from the start.
    NoPath,
}

impl PathResult {
    /// First cell to step into, if the route has one.
    #[must_use]
    pub fn next_step(&self) -> Option<CellCoord> {
        match self {
            Self::Found(route) => route.first().copied(),
            Self::NoPath => None,
        }
    }

    /// Number of moves along the route.
    #[must_use]
    pub fn hops(&self) -> Option<usize> {
        match self {
            Self::Found(route) => Some(route.len()),
            Self::NoPath => None,
        }
    }
}

/// Neighbourhood explored around each cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Orthogonal moves only.
    Four,
    /// Orthogonal and diagonal moves. A diagonal move is only allowed when
    /// both orthogonal cells it passes between are walkable.
    #[default]
    Eight,
}

static ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
static DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Shortest path search parameterised by connectivity.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathFinder {
    connectivity: Connectivity,
}

impl PathFinder {
    /// Creates a path finder exploring the provided neighbourhood.
    #[must_use]
    pub const fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// Finds a route with the fewest moves from `start` to `goal`.
    ///
    /// Start and goal must both lie on walkable cells; otherwise the query
    /// reports [`PathResult::NoPath`]. Neighbours are expanded in a fixed
    /// order, so ties between equally short routes resolve the same way on
    /// every call.
    #[must_use]
    pub fn find_path(&self, start: CellCoord, goal: CellCoord, grid: &GridMap) -> PathResult {
        self.search(start, goal, grid, |_| false)
    }

    /// Like [`PathFinder::find_path`], additionally treating every cell for
    /// which `is_occupied` returns `true` as impassable. The goal itself is
    /// never considered occupied.
    #[must_use]
    pub fn find_path_avoiding<F>(
        &self,
        start: CellCoord,
        goal: CellCoord,
        grid: &GridMap,
        is_occupied: F,
    ) -> PathResult
    where
        F: Fn(CellCoord) -> bool,
    {
        self.search(start, goal, grid, is_occupied)
    }

    fn search<F>(
        &self,
        start: CellCoord,
        goal: CellCoord,
        grid: &GridMap,
        is_occupied: F,
    ) -> PathResult
    where
        F: Fn(CellCoord) -> bool,
    {
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            return PathResult::NoPath;
        }
        if start == goal {
            return PathResult::Found(Vec::new());
        }
        let (Some(start_index), Some(goal_index)) = (grid.index(start), grid.index(goal)) else {
            return PathResult::NoPath;
        };

        let passable = |cell: CellCoord| cell == goal || (grid.is_walkable(cell) && !is_occupied(cell));

        let mut parents: Vec<Option<usize>> = vec![None; grid.cell_count()];
        let mut visited = vec![false; grid.cell_count()];
        visited[start_index] = true;

        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = grid.index(cell) else {
                continue;
            };

            for neighbor in self.neighbors(cell, &passable) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                if visited[neighbor_index] {
                    continue;
                }

                visited[neighbor_index] = true;
                parents[neighbor_index] = Some(current_index);

                if neighbor_index == goal_index {
                    return PathResult::Found(reconstruct(grid, &parents, start_index, goal_index));
                }
                queue.push_back(neighbor);
            }
        }

        tracing::trace!(?start, ?goal, "no path between cells");
        PathResult::NoPath
    }

    fn neighbors<'a, F>(
        &self,
        cell: CellCoord,
        passable: &'a F,
    ) -> impl Iterator<Item = CellCoord> + 'a
    where
        F: Fn(CellCoord) -> bool,
    {
        let diagonals: &'static [(i32, i32)] = match self.connectivity {
            Connectivity::Four => &[],
            Connectivity::Eight => &DIAGONAL,
        };

        ORTHOGONAL
            .iter()
            .map(move |&(dx, dy)| cell.offset(dx, dy))
            .filter(move |&neighbor| passable(neighbor))
            .chain(
                diagonals
                    .iter()
                    .filter(move |&&(dx, dy)| {
                        passable(cell.offset(dx, 0)) && passable(cell.offset(0, dy))
                    })
                    .map(move |&(dx, dy)| cell.offset(dx, dy))
                    .filter(move |&neighbor| passable(neighbor)),
            )
    }
}

/// Finds an 8-connected shortest route from `start` to `goal`.
#[must_use]
pub fn find_path(start: CellCoord, goal: CellCoord, grid: &GridMap) -> PathResult {
    PathFinder::default().find_path(start, goal, grid)
}

fn reconstruct(
    grid: &GridMap,
    parents: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<CellCoord> {
    let mut route = Vec::new();
    let mut current = goal_index;

    while current != start_index {
        let Some(cell) = grid.cell_at(current) else {
            break;
        };
        route.push(cell);
        match parents[current] {
            Some(parent) => current = parent,
            None => break,
        }
    }

    route.reverse();
    route
}
