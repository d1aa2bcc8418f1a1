//! Level layout: walls, decorations and agent spawns.

use duskfall_core::{AgentKind, AgentSpawn, Decoration, GridMap, MapLoadError, SpriteKey};
use glam::Vec2;

/// Built-in 16×9 map used when no map file is supplied.
pub const DEFAULT_MAP: &str = "\
1111111111111111
1.....2222.....1
1.3333....4....1
1.3.......4..5.1
1.3.......4..5.1
1...33333......1
1...3......55551
1...3..........1
1111111111111111
";

/// Everything needed to (re)build a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    grid: GridMap,
    decorations: Vec<Decoration>,
    spawns: Vec<AgentSpawn>,
}

impl Level {
    /// Creates a level from its parts.
    #[must_use]
    pub fn new(grid: GridMap, decorations: Vec<Decoration>, spawns: Vec<AgentSpawn>) -> Self {
        Self {
            grid,
            decorations,
            spawns,
        }
    }

    /// Parses a bare map with no decorations or agents.
    pub fn from_map(text: &str) -> Result<Self, MapLoadError> {
        Ok(Self::new(GridMap::parse(text)?, Vec::new(), Vec::new()))
    }

    /// Built-in level with lights, a candelabra and one agent of each kind.
    #[must_use]
    pub fn builtin() -> Self {
        let grid = match GridMap::parse(DEFAULT_MAP) {
            Ok(grid) => grid,
            Err(_) => GridMap::enclosed_room(16, 9),
        };

        let decoration = |sprite, x, y| Decoration {
            sprite,
            position: Vec2::new(x, y),
        };
        let spawn = |kind, x, y| AgentSpawn {
            kind,
            position: Vec2::new(x, y),
        };

        Self::new(
            grid,
            vec![
                decoration(SpriteKey::Candelabra, 5.5, 3.5),
                decoration(SpriteKey::GreenLight, 1.5, 1.5),
                decoration(SpriteKey::GreenLight, 14.5, 1.5),
                decoration(SpriteKey::RedLight, 14.5, 7.5),
                decoration(SpriteKey::RedLight, 7.5, 6.5),
            ],
            vec![
                spawn(AgentKind::Soldier, 11.5, 2.5),
                spawn(AgentKind::Cacodemon, 8.5, 7.5),
                spawn(AgentKind::Cyberdemon, 14.5, 4.5),
            ],
        )
    }

    /// Wall layout.
    #[must_use]
    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    /// Sprites placed at load time.
    #[must_use]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Agents placed at load time.
    #[must_use]
    pub fn spawns(&self) -> &[AgentSpawn] {
        &self.spawns
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use duskfall_core::{CellCoord, PlayerConfig};

    use super::*;

    #[test]
    fn builtin_map_parses_to_sixteen_by_nine() {
        let grid = GridMap::parse(DEFAULT_MAP).expect("built-in map is valid");

        assert_eq!((grid.columns(), grid.rows()), (16, 9));
    }

    #[test]
    fn builtin_objects_stand_on_free_cells() {
        let level = Level::builtin();
        let grid = level.grid();

        for decoration in level.decorations() {
            assert!(grid.is_walkable(CellCoord::containing(decoration.position)));
        }
        for spawn in level.spawns() {
            assert!(grid.is_walkable(CellCoord::containing(spawn.position)));
        }
        let start = PlayerConfig::default().start_position();
        assert!(grid.is_walkable(CellCoord::containing(start)));
    }
}
