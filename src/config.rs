use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlipError};
use crate::roster::ATTENDANCES_PER_SLIP;
use crate::roster::extract::{
    DEFAULT_CONFIRMED_VALUES, DEFAULT_ID_COLUMN, DEFAULT_IDENTITY_COLUMN, DEFAULT_PLACEHOLDER_ROWS,
};

pub const PROJECT_CONFIG_NAME: &str = "slipday.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub slips: SlipsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SLIPDAY_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            } else {
                return Err(SlipError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_NAME))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a config document and layer it over the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("slipday/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SlipError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SlipError::Config(format!("parse config {}: {err}", path.display())))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.snapshot {
            self.snapshot.merge(patch);
        }
        if let Some(patch) = patch.slips {
            self.slips.merge(patch);
        }
        if let Some(patch) = patch.paths {
            self.paths.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if env_bool("SLIPDAY_ROBOT").unwrap_or(false) {
            self.robot.format = "json".to_string();
        }
        if let Some(value) = env_string("SLIPDAY_IMPORT_DIR") {
            self.paths.import_dir = PathBuf::from(value);
        }
        if let Some(value) = env_string("SLIPDAY_SAVE_FILE") {
            self.paths.save_file = PathBuf::from(value);
        }
        if let Some(values) = env_list("SLIPDAY_CONFIRMED_VALUES") {
            self.snapshot.confirmed_values = values;
        }
        if let Some(value) = env_u32("SLIPDAY_ATTENDANCES_PER_SLIP")? {
            self.slips.attendances_per_slip = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.slips.attendances_per_slip == 0 {
            return Err(SlipError::Config(
                "slips.attendances_per_slip must be at least 1".to_string(),
            ));
        }
        if self.snapshot.identity_column.trim().is_empty() {
            return Err(SlipError::Config(
                "snapshot.identity_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn robot_mode(&self) -> bool {
        self.robot.format.eq_ignore_ascii_case("json")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub identity_column: String,
    #[serde(default)]
    pub id_column: String,
    /// Cell values counted as confirmed attendance (exact, case-sensitive).
    #[serde(default)]
    pub confirmed_values: Vec<String>,
    /// Non-person rows, compared case-insensitively against the identity cell.
    #[serde(default)]
    pub placeholder_rows: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            identity_column: DEFAULT_IDENTITY_COLUMN.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            confirmed_values: DEFAULT_CONFIRMED_VALUES.iter().map(ToString::to_string).collect(),
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SnapshotConfig {
    fn merge(&mut self, patch: SnapshotPatch) {
        if let Some(value) = patch.identity_column {
            self.identity_column = value;
        }
        if let Some(value) = patch.id_column {
            self.id_column = value;
        }
        if let Some(values) = patch.confirmed_values {
            self.confirmed_values = values;
        }
        if let Some(values) = patch.placeholder_rows {
            self.placeholder_rows = values;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipsConfig {
    #[serde(default)]
    pub attendances_per_slip: u32,
}

impl Default for SlipsConfig {
    fn default() -> Self {
        Self {
            attendances_per_slip: ATTENDANCES_PER_SLIP,
        }
    }
}

impl SlipsConfig {
    fn merge(&mut self, patch: SlipsPatch) {
        if let Some(value) = patch.attendances_per_slip {
            self.attendances_per_slip = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub import_dir: PathBuf,
    #[serde(default)]
    pub save_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            import_dir: PathBuf::from("import"),
            save_file: PathBuf::from("save.txt"),
        }
    }
}

impl PathsConfig {
    fn merge(&mut self, patch: PathsPatch) {
        if let Some(value) = patch.import_dir {
            self.import_dir = value;
        }
        if let Some(value) = patch.save_file {
            self.save_file = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub format: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub snapshot: Option<SnapshotPatch>,
    pub slips: Option<SlipsPatch>,
    pub paths: Option<PathsPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SnapshotPatch {
    pub identity_column: Option<String>,
    pub id_column: Option<String>,
    pub confirmed_values: Option<Vec<String>>,
    pub placeholder_rows: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SlipsPatch {
    pub attendances_per_slip: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PathsPatch {
    pub import_dir: Option<PathBuf>,
    pub save_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<u32>().map(Some).map_err(|err| {
            SlipError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}
