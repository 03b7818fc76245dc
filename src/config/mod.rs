//! Flag catalog configuration.
//!
//! The catalog lists the flags an application defines, with their configured
//! defaults, and the dev flags it knows about without registering them. It is
//! read from KDL files:
//!
//! - System: `~/.config/flagdeck/flags.kdl` (or `$FLAGDECK_CONFIG_DIR/flags.kdl`)
//! - Project: `<project>/flagdeck.kdl`
//! - Explicit: `--config <path>`, replacing the project file
//!
//! ## Precedence
//!
//! For flag defaults: explicit/project > system
//! For `reveal-on-load`: CLI flag > explicit/project > system > default (`false`)
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, ConfigSource, LoadedLayer, PROJECT_CONFIG_FILE,
    Resolved, ResolvedCatalog, SYSTEM_CONFIG_FILE, resolve_catalog, resolve_catalog_with_system,
    system_config_path,
};
pub use schema::FlagConfig;
