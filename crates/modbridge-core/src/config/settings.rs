use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityKind, KnownCapability, VersionBounds};
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::format::ConfigFormat;
use crate::kernel::constants::{DEFAULT_REGION_SHIFT, DEFAULT_REGION_WORKERS, MAX_REGION_SHIFT};

/// Which scheduling strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerModeSetting {
    /// Pick from the host: region-parallel when its marker module resolves.
    #[default]
    Auto,
    Global,
    Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub mode: SchedulerModeSetting,
    /// Region worker threads; 0 sizes the pool from the available parallelism.
    pub region_workers: usize,
    /// Chunk-to-region shift; a region spans `2^region_shift` chunks per side.
    pub region_shift: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { mode: SchedulerModeSetting::Auto, region_workers: 0, region_shift: DEFAULT_REGION_SHIFT }
    }
}

impl SchedulerSettings {
    /// Effective number of region workers.
    pub fn worker_count(&self) -> usize {
        if self.region_workers > 0 {
            return self.region_workers;
        }
        thread::available_parallelism().map(|n| n.get()).unwrap_or(DEFAULT_REGION_WORKERS)
    }
}

/// One capability the host should probe for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityEntry {
    pub id: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,
}

impl CapabilityEntry {
    pub fn new(id: &str, module: &str) -> Self {
        Self { id: id.to_string(), module: module.to_string(), min_version: None, max_version: None }
    }

    pub fn with_versions(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min_version = min.map(str::to_owned);
        self.max_version = max.map(str::to_owned);
        self
    }
}

/// Configuration of the compatibility layer.
///
/// Every field has a default, so an empty file is a valid configuration
/// that probes the four built-in capability families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    pub scheduler: SchedulerSettings,
    pub capabilities: Vec<CapabilityEntry>,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerSettings::default(),
            capabilities: CapabilityKind::ALL
                .iter()
                .map(|kind| CapabilityEntry::new(kind.id(), kind.default_module()))
                .collect(),
        }
    }
}

impl CompatConfig {
    /// Load and validate a config file; the format follows the extension.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let format =
            ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat { path: path.to_path_buf() })?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::parse(&data, format)?;
        log::debug!("Loaded {} capabilities from {}", config.capabilities.len(), path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(data: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let config: Self = format.parse(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        format.render(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.scheduler.region_shift > MAX_REGION_SHIFT {
            return Err(ConfigError::Invalid {
                message: format!(
                    "scheduler.region_shift {} exceeds the maximum of {}",
                    self.scheduler.region_shift, MAX_REGION_SHIFT
                ),
            });
        }
        let mut seen = HashSet::new();
        for entry in &self.capabilities {
            if entry.id.trim().is_empty() || entry.module.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "capability entries need a non-empty id and module".to_string(),
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::DuplicateCapability { id: entry.id.clone() });
            }
        }
        self.known_capabilities().map(|_| ())
    }

    /// Capability list for the probe, with version bounds parsed.
    pub fn known_capabilities(&self) -> ConfigResult<Vec<KnownCapability>> {
        self.capabilities
            .iter()
            .map(|entry| {
                let bounds = VersionBounds::parse(entry.min_version.as_deref(), entry.max_version.as_deref())
                    .map_err(|source| ConfigError::InvalidVersion { capability: entry.id.clone(), source })?;
                Ok(KnownCapability::new(&entry.id, &entry.module, bounds))
            })
            .collect()
    }
}
