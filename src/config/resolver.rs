//! Layered resolution of the flag catalog.
//!
//! ## Catalog Precedence (highest to lowest)
//!
//! 1. `--config <path>` CLI flag (replaces the project layer)
//! 2. Project catalog (`<project>/flagdeck.kdl`)
//! 3. System catalog (`$FLAGDECK_CONFIG_DIR/flags.kdl`, else
//!    `~/.config/flagdeck/flags.kdl`)
//!
//! Layers merge per flag: a higher layer's definition replaces the default of
//! the same flag in a lower layer, and flags only a lower layer defines stay.

use super::FlagConfig;
use crate::flags::{DevFlagSet, FlagRegistry, FlagSession, SessionOptions};
use crate::models::OverrideMap;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "FLAGDECK_CONFIG_DIR";

/// Catalog file name inside a project root.
pub const PROJECT_CONFIG_FILE: &str = "flagdeck.kdl";

/// Catalog file name inside the system config directory.
pub const SYSTEM_CONFIG_FILE: &str = "flags.kdl";

/// Tracks which layer a resolved setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from the project catalog
    Project,
    /// Value from the system catalog
    System,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliFlag => write!(f, "cli"),
            ConfigSource::Project => write!(f, "project"),
            ConfigSource::System => write!(f, "system"),
            ConfigSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ConfigSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// A catalog file that contributed to the resolved catalog.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedLayer {
    pub source: ConfigSource,
    pub path: PathBuf,
}

/// CLI overrides for catalog resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit catalog file replacing the project catalog
    pub config_path: Option<PathBuf>,
    /// Force reveal-on-load on or off
    pub reveal_on_load: Option<bool>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set explicit catalog path.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set reveal-on-load override.
    pub fn with_reveal_on_load(mut self, reveal: bool) -> Self {
        self.reveal_on_load = Some(reveal);
        self
    }
}

/// Fully resolved catalog with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    /// Defined flags with their merged defaults
    pub registry: FlagRegistry,
    /// Dev flags from every layer
    pub dev_flags: DevFlagSet,
    /// Whether a seeded session starts with the editor open
    pub reveal_on_load: Resolved<bool>,
    /// Files that were read, lowest precedence first
    pub layers: Vec<LoadedLayer>,
}

impl ResolvedCatalog {
    /// Start a session over this catalog.
    ///
    /// The editor starts open only when `reveal-on-load` is set and the seed
    /// carries at least one override.
    pub fn start_session(&self, seed: OverrideMap) -> FlagSession {
        let force_visible = self.reveal_on_load.value && !seed.is_empty();
        FlagSession::start(
            self.registry.clone(),
            self.dev_flags.clone(),
            SessionOptions {
                seed,
                force_visible,
            },
        )
    }
}

/// Location of the system catalog, if one can be determined.
pub fn system_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join(SYSTEM_CONFIG_FILE));
        }
    }
    dirs::config_dir().map(|d| d.join("flagdeck").join(SYSTEM_CONFIG_FILE))
}

/// Resolve the catalog for a project with full precedence chain.
pub fn resolve_catalog(project_root: &Path, overrides: &ConfigOverrides) -> Result<ResolvedCatalog> {
    resolve_catalog_with_system(system_config_path().as_deref(), project_root, overrides)
}

/// Resolve the catalog with an explicit system catalog path.
pub fn resolve_catalog_with_system(
    system_path: Option<&Path>,
    project_root: &Path,
    overrides: &ConfigOverrides,
) -> Result<ResolvedCatalog> {
    let mut merged = FlagConfig::new();
    let mut layers = Vec::new();
    let mut reveal_on_load = Resolved::new(false, ConfigSource::Default);

    // System catalog (lowest precedence)
    if let Some(path) = system_path {
        if let Some(system) = FlagConfig::load(path)? {
            if let Some(reveal) = system.reveal_on_load {
                reveal_on_load = Resolved::new(reveal, ConfigSource::System);
            }
            merged.merge(&system);
            layers.push(LoadedLayer {
                source: ConfigSource::System,
                path: path.to_path_buf(),
            });
        }
    }

    // Project catalog, or the explicit file that replaces it
    let (upper_path, upper_source) = match overrides.config_path {
        Some(ref path) => {
            if !path.exists() {
                return Err(Error::InvalidInput(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            (path.clone(), ConfigSource::CliFlag)
        }
        None => (project_root.join(PROJECT_CONFIG_FILE), ConfigSource::Project),
    };
    if let Some(upper) = FlagConfig::load(&upper_path)? {
        if let Some(reveal) = upper.reveal_on_load {
            reveal_on_load = Resolved::new(reveal, upper_source);
        }
        merged.merge(&upper);
        layers.push(LoadedLayer {
            source: upper_source,
            path: upper_path,
        });
    }

    if let Some(reveal) = overrides.reveal_on_load {
        reveal_on_load = Resolved::new(reveal, ConfigSource::CliFlag);
    }

    let mut dev_flags = DevFlagSet::new();
    for id in merged.dev_flags {
        dev_flags.insert(id);
    }

    Ok(ResolvedCatalog {
        registry: FlagRegistry::from_definitions(merged.flags)?,
        dev_flags,
        reveal_on_load,
        layers,
    })
}
