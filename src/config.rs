use directories_next::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_WEATHER_URL: &str = "https://wttr.in/?format=%C+%t";
const APP_NAME: &str = "todo-deck";
const SLOT_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not determine a home directory")]
    NoHome,
}

/// On-disk configuration; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub weather: Option<bool>,
    pub weather_url: Option<String>,
}

/// Overrides coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub no_weather: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub weather: bool,
    pub weather_url: String,
}

impl FileConfig {
    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Fills unset values from `data_dir`, with CLI overrides winning.
    pub fn resolve(file: FileConfig, overrides: Overrides, data_dir: &Path) -> Self {
        let data_file = overrides
            .data_file
            .or(file.data_file)
            .unwrap_or_else(|| data_dir.join(SLOT_FILE_NAME));
        let log_dir = data_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.to_path_buf());
        Self {
            export_dir: file.export_dir.unwrap_or_else(|| data_dir.to_path_buf()),
            log_dir,
            data_file,
            log_level: file.log_level.unwrap_or_else(|| "info".to_string()),
            weather: file.weather.unwrap_or(true) && !overrides.no_weather,
            weather_url: file
                .weather_url
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
        }
    }

    /// Loads `config_path` (or the platform default) and resolves it.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoHome)?;
        let default_path = dirs.config_dir().join("config.toml");
        let file = FileConfig::load(config_path.unwrap_or(&default_path))?;
        Ok(Self::resolve(file, overrides, dirs.data_dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_data_dir() {
        let config = Config::resolve(
            FileConfig::default(),
            Overrides::default(),
            Path::new("/data"),
        );
        assert_eq!(config.data_file, Path::new("/data/tasks.json"));
        assert_eq!(config.export_dir, Path::new("/data"));
        assert_eq!(config.log_dir, Path::new("/data"));
        assert_eq!(config.log_level, "info");
        assert!(config.weather);
        assert_eq!(config.weather_url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn cli_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            data_file = "/file/tasks.json"
            weather = true
            log_level = "debug"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            data_file: Some("/cli/mine.json".into()),
            no_weather: true,
        };
        let config = Config::resolve(file, overrides, Path::new("/data"));
        assert_eq!(config.data_file, Path::new("/cli/mine.json"));
        assert_eq!(config.log_dir, Path::new("/cli"));
        assert_eq!(config.log_level, "debug");
        assert!(!config.weather);
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FileConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "colour = \"blue\"").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
