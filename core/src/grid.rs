//! Static wall layout the world is played on.

use std::num::NonZeroU8;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that cells outside the map (a ray leaving the
/// grid, an agent probing past the border) remain representable without
/// wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell that contains the provided world-space point.
    #[must_use]
    pub fn containing(point: Vec2) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32)
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Returns the cell displaced by the provided column and row deltas,
    /// saturating at the edges of the coordinate space.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Texture identifier painted on a wall cell. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(NonZeroU8);

impl WallId {
    /// Wraps a raw wall value, returning `None` for the free-cell marker `0`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        match NonZeroU8::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Raw texture identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0.get()
    }
}

/// Reasons a textual or numeric map description may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapLoadError {
    /// The description did not contain a single row.
    #[error("map contains no rows")]
    Empty,
    /// A row is wider or narrower than the first row.
    #[error("row {row} has {found} cells but the map is {expected} cells wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph in a textual map has no meaning.
    #[error("unknown map glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Character that could not be interpreted.
        glyph: char,
        /// Zero-based row of the glyph.
        row: usize,
        /// Zero-based column of the glyph.
        column: usize,
    },
    /// The map does not fit into signed 32-bit cell coordinates.
    #[error("map dimensions {columns}x{rows} exceed the supported size")]
    TooLarge {
        /// Number of columns requested.
        columns: usize,
        /// Number of rows requested.
        rows: usize,
    },
}

/// Dense, immutable grid of wall cells.
///
/// Each cell stores `0` when free or a non-zero [`WallId`]. Lookups outside
/// the grid never index the backing storage: [`GridMap::wall_at`] reports no
/// wall there while [`GridMap::is_blocked`] treats the outside as solid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    cells: Vec<u8>,
}

impl GridMap {
    /// Builds a map from numeric rows where `0` marks a free cell.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, MapLoadError>
    where
        R: AsRef<[u8]>,
    {
        let Some(first) = rows.first() else {
            return Err(MapLoadError::Empty);
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(MapLoadError::Empty);
        }

        let columns = u32::try_from(width).ok().filter(|value| *value <= i32::MAX as u32);
        let row_count = u32::try_from(rows.len())
            .ok()
            .filter(|value| *value <= i32::MAX as u32);
        let (Some(columns), Some(row_count)) = (columns, row_count) else {
            return Err(MapLoadError::TooLarge {
                columns: width,
                rows: rows.len(),
            });
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MapLoadError::RaggedRow {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Parses the textual map format.
    ///
    /// `.`, `_` and spaces are free cells, digits `1`-`9` are walls carrying
    /// that texture id and `#` is shorthand for wall `1`. Blank lines are
    /// skipped and trailing carriage returns are ignored.
    pub fn parse(text: &str) -> Result<Self, MapLoadError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let row_index = rows.len();
            let mut row = Vec::with_capacity(line.len());
            for (column, glyph) in line.chars().enumerate() {
                let value = match glyph {
                    '.' | '_' | ' ' => 0,
                    '#' => 1,
                    '1'..='9' => glyph as u8 - b'0',
                    _ => {
                        return Err(MapLoadError::UnknownGlyph {
                            glyph,
                            row: row_index,
                            column,
                        })
                    }
                };
                row.push(value);
            }
            rows.push(row);
        }

        Self::from_rows(&rows)
    }

    /// Creates a rectangular room whose border cells are walls and whose
    /// interior is free.
    #[must_use]
    pub fn enclosed_room(columns: u32, rows: u32) -> Self {
        let columns = columns.min(i32::MAX as u32);
        let rows = rows.min(i32::MAX as u32);
        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                let border = row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
                cells.push(u8::from(border));
            }
        }

        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Row-major index of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() || self.columns == 0 {
            return None;
        }

        let width = self.columns as usize;
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Wall occupying the cell, or `None` when the cell is free or outside.
    #[must_use]
    pub fn wall_at(&self, cell: CellCoord) -> Option<WallId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .and_then(WallId::new)
    }

    /// Reports whether a wall occupies the cell. Cells outside are not walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.wall_at(cell).is_some()
    }

    /// Reports whether the cell cannot be entered: a wall or outside the grid.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        !self.contains(cell) || self.is_wall(cell)
    }

    /// Reports whether the cell lies inside the grid and holds no wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        !self.is_blocked(cell)
    }
}
