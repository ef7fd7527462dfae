//! Configuration loading.
//!
//! Values come from built-in defaults, optionally replaced by a TOML file,
//! then by `VESSEL_EXPORT_*` environment variables. A leading `~/` in a path
//! expands to the user's home directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::owners::OwnerColumns;
use crate::paths::OutputLayout;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "VESSEL_EXPORT_";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub owner_map: OwnerMapConfig,
    pub engine: EngineConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Folder holding one source workbook per vessel.
    pub input_dir: PathBuf,
    pub pdf_root: PathBuf,
    pub backup_root: PathBuf,
    pub secondary_backup_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let base = default_base();
        Self {
            input_dir: base.join("Input"),
            pdf_root: base.join("Output").join("PDF"),
            backup_root: base.join("Output").join("XLS"),
            secondary_backup_root: base.join("Secondary Backup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerMapConfig {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub vessel_column: String,
    pub owner_column: String,
}

impl Default for OwnerMapConfig {
    fn default() -> Self {
        let columns = OwnerColumns::default();
        Self {
            path: default_base().join("Vessel and Owner.xlsx"),
            sheet: columns.sheet,
            vessel_column: columns.vessel,
            owner_column: columns.owner,
        }
    }
}

impl OwnerMapConfig {
    pub fn columns(&self) -> OwnerColumns {
        OwnerColumns {
            sheet: self.sheet.clone(),
            vessel: self.vessel_column.clone(),
            owner: self.owner_column.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Process image names killed before an engine session starts.
    pub stray_processes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// Parses a TOML document, expands `~/` paths, and validates the result.
    /// Environment overrides are not applied.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.expand_home();
        config.validate()?;
        Ok(config)
    }

    /// Applies `VESSEL_EXPORT_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        if let Some(value) = var("INPUT_DIR") {
            self.paths.input_dir = expand_home(Path::new(&value));
        }
        if let Some(value) = var("PDF_ROOT") {
            self.paths.pdf_root = expand_home(Path::new(&value));
        }
        if let Some(value) = var("BACKUP_ROOT") {
            self.paths.backup_root = expand_home(Path::new(&value));
        }
        if let Some(value) = var("SECONDARY_BACKUP_ROOT") {
            self.paths.secondary_backup_root = expand_home(Path::new(&value));
        }
        if let Some(value) = var("OWNER_MAP") {
            self.owner_map.path = expand_home(Path::new(&value));
        }
        if let Some(value) = var("STRICT") {
            self.export.strict = value.parse().map_err(|_| {
                ToolError::Config(format!("{ENV_PREFIX}STRICT must be true or false, got '{value}'"))
            })?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level = value;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let vessel = self.owner_map.vessel_column.trim();
        let owner = self.owner_map.owner_column.trim();
        if vessel.is_empty() || owner.is_empty() {
            return Err(ToolError::Config(
                "owner_map.vessel_column and owner_map.owner_column must not be empty".into(),
            ));
        }
        if vessel.eq_ignore_ascii_case(owner) {
            return Err(ToolError::Config(format!(
                "owner_map.vessel_column and owner_map.owner_column are both '{vessel}'"
            )));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ToolError::Config(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout {
            pdf_root: self.paths.pdf_root.clone(),
            backup_root: self.paths.backup_root.clone(),
            secondary_backup_root: self.paths.secondary_backup_root.clone(),
        }
    }

    fn expand_home(&mut self) {
        for path in [
            &mut self.paths.input_dir,
            &mut self.paths.pdf_root,
            &mut self.paths.backup_root,
            &mut self.paths.secondary_backup_root,
            &mut self.owner_map.path,
        ] {
            *path = expand_home(path);
        }
    }
}

/// Loads the configuration file at `path` and applies environment overrides.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    let mut config = AppConfig::from_toml_str(&contents)?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Built-in defaults with environment overrides applied.
pub fn default_config() -> Result<AppConfig> {
    let mut config = AppConfig::default();
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Replaces a leading `~` component with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

fn default_base() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Vessel Reports")
}
