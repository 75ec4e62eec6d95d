//! User configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audit::{AuditPolicy, DEFAULT_CUTOFF_HOUR, DEFAULT_NEAR_DUE_DAYS};

const APP_DIR: &str = "taskboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default = "default_audit_interval_minutes")]
    pub audit_interval_minutes: u64,

    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,

    #[serde(default = "default_near_due_days")]
    pub near_due_days: i64,
}

fn default_audit_interval_minutes() -> u64 {
    30
}

fn default_cutoff_hour() -> u32 {
    DEFAULT_CUTOFF_HOUR
}

fn default_near_due_days() -> i64 {
    DEFAULT_NEAR_DUE_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            audit_interval_minutes: default_audit_interval_minutes(),
            cutoff_hour: default_cutoff_hour(),
            near_due_days: default_near_due_days(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl Config {
    /// Loads the config at `path`, or the default location. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Ok(Config::default()),
        };
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cutoff_hour > 23 {
            bail!("cutoff_hour must be between 0 and 23, got {}", self.cutoff_hour);
        }
        if self.audit_interval_minutes == 0 {
            bail!("audit_interval_minutes must be at least 1");
        }
        if self.near_due_days < 0 {
            bail!("near_due_days must not be negative, got {}", self.near_due_days);
        }
        Ok(())
    }

    /// Where the board lives: the configured file, else `<data_dir>/taskboard/tasks.json`.
    pub fn data_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(expand_home(path));
        }
        let dir = dirs::data_dir().context("Cannot find a data directory for this platform")?;
        Ok(dir.join(APP_DIR).join("tasks.json"))
    }

    pub fn audit_policy(&self) -> AuditPolicy {
        AuditPolicy {
            cutoff_hour: self.cutoff_hour,
            near_due_days: self.near_due_days,
        }
    }

    pub fn audit_interval(&self) -> Duration {
        Duration::from_secs(self.audit_interval_minutes * 60)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
