// workout-planner-lib/src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::EnumString;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "workout-planner";
const CONFIG_ENV_VAR: &str = "WORKOUT_PLANNER_CONFIG_DIR";
pub const DEFAULT_SLOT_NAME: &str = "workoutExercises";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Slot name cannot be empty.")]
    EmptySlotName,
}

/// Header colors the table renderer understands. Names match case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
}

impl From<StandardColor> for Color {
    fn from(color: StandardColor) -> Self {
        use StandardColor as C;
        match color {
            C::Black => Color::Black,
            C::Red => Color::Red,
            C::Green => Color::Green,
            C::Yellow => Color::Yellow,
            C::Blue => Color::Blue,
            C::Magenta => Color::Magenta,
            C::Cyan => Color::Cyan,
            C::White => Color::White,
            C::Grey => Color::Grey,
            C::DarkGrey => Color::DarkGrey,
            C::DarkRed => Color::DarkRed,
            C::DarkGreen => Color::DarkGreen,
            C::DarkYellow => Color::DarkYellow,
            C::DarkBlue => Color::DarkBlue,
            C::DarkMagenta => Color::DarkMagenta,
            C::DarkCyan => Color::DarkCyan,
        }
    }
}

/// # Errors
/// Returns `ConfigError::InvalidColor` for unknown names.
pub fn parse_color(name: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::from_str(name.trim()).map_err(|_| ConfigError::InvalidColor(name.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String, // Color name, checked by `header_color()`
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

impl Theme {
    /// # Errors
    /// Returns `ConfigError::InvalidColor` if the stored name is unknown.
    pub fn header_color(&self) -> Result<StandardColor, ConfigError> {
        parse_color(&self.header_color)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Name of the durable slot; the file is `<slot_name>.json`.
    pub slot_name: String,
    /// Directory for the slot. Platform data directory when unset.
    pub data_dir: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slot_name: DEFAULT_SLOT_NAME.to_string(),
            data_dir: None,
            theme: Theme::default(),
        }
    }
}

/// Determines the path to the configuration file, creating its directory.
/// # Errors
/// Returns `ConfigError` if no directory can be determined or created.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_path = match std::env::var(CONFIG_ENV_VAR) {
        Ok(path_str) if !path_str.trim().is_empty() => PathBuf::from(path_str),
        _ => dirs::config_dir()
            .ok_or(ConfigError::CannotDetermineConfigDir)?
            .join(APP_CONFIG_DIR),
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing a default file if none exists.
/// # Errors
/// Returns `ConfigError` on I/O or TOML errors, or if the slot name is blank.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        if config.slot_name.trim().is_empty() {
            return Err(ConfigError::EmptySlotName);
        }
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// # Errors
/// Returns `ConfigError` on I/O or serialization errors.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}
