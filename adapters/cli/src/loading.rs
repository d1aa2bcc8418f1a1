use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use duskfall_core::{CellCoord, GameConfig};
use duskfall_world::Level;

/// Reads a TOML configuration file, or returns the defaults when no path is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    GameConfig::from_toml_str(&source)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Reads a text map, or returns the built-in level when no path is given.
///
/// The player's start position must lie on a free cell of the chosen map.
pub fn load_level(path: Option<&Path>, config: &GameConfig) -> Result<Level> {
    let level = match path {
        None => Level::builtin(),
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read map file {}", path.display()))?;
            Level::from_map(&source)
                .with_context(|| format!("invalid map file {}", path.display()))?
        }
    };

    let start = CellCoord::containing(config.player.start_position());
    ensure!(
        level.grid().is_walkable(start),
        "player start ({}, {}) is not on a free cell",
        config.player.start_x,
        config.player.start_y
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_files() {
        let config = load_config(None).expect("defaults");
        let level = load_level(None, &config).expect("built-in level");

        assert_eq!(config, GameConfig::default());
        assert_eq!(level, Level::builtin());
    }

    #[test]
    fn missing_files_report_their_path() {
        let error = load_config(Some(Path::new("/nonexistent/duskfall.toml")))
            .expect_err("file does not exist");

        assert!(format!("{error:#}").contains("/nonexistent/duskfall.toml"));
    }

    #[test]
    fn start_inside_a_wall_is_rejected() {
        let mut config = GameConfig::default();
        config.player.start_x = 0.5;
        config.player.start_y = 0.5;

        assert!(load_level(None, &config).is_err());
    }
}
