use crate::scores::Store;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Gameplay timing and geometry
    pub(crate) game: GameConfig,

    /// Settings about data files
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("serpent").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist
    /// and `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// The interval between game ticks for the given device class.  This is
    /// the single place the class-to-speed mapping lives.
    pub(crate) fn tick_period(&self, device: DeviceClass) -> Duration {
        match device {
            DeviceClass::Regular => Duration::from_millis(self.game.tick_ms),
            DeviceClass::Compact => Duration::from_millis(self.game.compact_tick_ms),
        }
    }

    /// Return the filepath at which the best score should be stored, or
    /// `None` if score persistence is disabled (or no path can be
    /// determined).
    pub(crate) fn score_file(&self) -> Option<PathBuf> {
        if !self.files.save_scores {
            return None;
        }
        self.files.score_file.clone().or_else(Store::default_path)
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    /// Tick interval on regular (wide) surfaces, in milliseconds
    pub(crate) tick_ms: u64,

    /// Tick interval on compact (narrow) surfaces, in milliseconds.
    /// Compact surfaces get a slower snake.
    pub(crate) compact_tick_ms: u64,

    /// Surfaces narrower than this many pixels count as compact
    pub(crate) compact_width: f64,

    /// Minimum cell size handed to the grid sizer, in pixels
    pub(crate) min_cell_size: f64,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            tick_ms: 100,
            compact_tick_ms: 170,
            compact_width: 100.0,
            min_cell_size: 2.0,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which the best score should be stored
    score_file: Option<PathBuf>,

    /// Whether to load & save the best score in a file
    save_scores: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            score_file: None,
            save_scores: true,
        }
    }
}

/// Coarse classification of the display surface, recomputed once per
/// applied resize and threaded through from there; never re-derived ad hoc.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DeviceClass {
    Regular,
    Compact,
}

impl DeviceClass {
    pub(crate) fn of(surface_width: f64, compact_width: f64) -> DeviceClass {
        if surface_width < compact_width {
            DeviceClass::Compact
        } else {
            DeviceClass::Regular
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(
            config.tick_period(DeviceClass::Regular),
            Duration::from_millis(100)
        );
        assert_eq!(
            config.tick_period(DeviceClass::Compact),
            Duration::from_millis(170)
        );
        assert_eq!(config.game.min_cell_size, 2.0);
        assert_eq!(config.score_file(), Store::default_path());
    }

    #[test]
    fn parse_full_file() {
        let src = concat!(
            "[game]\n",
            "tick-ms = 80\n",
            "compact-tick-ms = 150\n",
            "compact-width = 120.0\n",
            "min-cell-size = 3.0\n",
            "\n",
            "[files]\n",
            "save-scores = false\n",
        );
        let config: Config = toml::from_str(src).unwrap();
        assert_eq!(config.game.tick_ms, 80);
        assert_eq!(config.game.compact_tick_ms, 150);
        assert_eq!(config.game.compact_width, 120.0);
        assert_eq!(config.game.min_cell_size, 3.0);
        assert_eq!(config.score_file(), None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml"), true).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::load(&dir.path().join("config.toml"), false).is_err());
    }

    #[test]
    fn explicit_score_file_wins() {
        let src = "[files]\nscore-file = \"/tmp/scores.json\"\n";
        let config: Config = toml::from_str(src).unwrap();
        assert_eq!(config.score_file(), Some(PathBuf::from("/tmp/scores.json")));
    }

    #[rstest]
    #[case(80.0, DeviceClass::Compact)]
    #[case(100.0, DeviceClass::Regular)]
    #[case(240.0, DeviceClass::Regular)]
    fn device_class(#[case] width: f64, #[case] expected: DeviceClass) {
        assert_eq!(DeviceClass::of(width, 100.0), expected);
    }
}
