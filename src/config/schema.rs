//! KDL schema for flag catalog files.
//!
//! This module provides:
//! - The Rust struct representing one catalog file
//! - Parsing from KDL
//! - Layer merging

use crate::models::{FlagDefinition, FlagId};
use crate::Result;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::path::Path;

/// Contents of one flag catalog file.
///
/// # KDL Schema
///
/// ```kdl
/// // Flags defined by the application config
/// flag "disableHome" #false
/// flag "disableProjects" #true
/// flag "experimentalThing"       // default left unset
///
/// // Flags referenced in code but not formally registered
/// dev-flag "devOnlyWidget"
///
/// // Open the override editor when a session starts with overrides
/// reveal-on-load #true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagConfig {
    /// Defined flags in file order, one entry per ID (last wins)
    pub flags: Vec<FlagDefinition>,

    /// Dev flags in file order, deduplicated
    pub dev_flags: Vec<FlagId>,

    /// Whether a session seeded with overrides starts with the editor open
    pub reveal_on_load: Option<bool>,
}

impl FlagConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a catalog file. Returns `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let doc: KdlDocument = content.parse()?;
        tracing::debug!(path = %path.display(), "loaded flag config");
        Ok(Some(Self::from_kdl(&doc)))
    }

    /// Parse a catalog from a KDL document.
    ///
    /// Malformed entries are dropped individually: a `flag` node whose name is
    /// missing is skipped, and a non-boolean default leaves the flag defined
    /// with no default.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        for node in doc.nodes() {
            match node.name().value() {
                "flag" => {
                    let Some(id) = first_string(node).and_then(|s| FlagId::new(s).ok()) else {
                        tracing::warn!("skipping flag node without a name");
                        continue;
                    };
                    let default = match positional(node, 1) {
                        None => None,
                        Some(KdlValue::Bool(b)) => Some(*b),
                        Some(other) => {
                            tracing::warn!(flag = %id, value = %other, "ignoring non-boolean flag default");
                            None
                        }
                    };
                    config.define(FlagDefinition::new(id, default));
                }
                "dev-flag" => {
                    let Some(id) = first_string(node).and_then(|s| FlagId::new(s).ok()) else {
                        tracing::warn!("skipping dev-flag node without a name");
                        continue;
                    };
                    if !config.dev_flags.contains(&id) {
                        config.dev_flags.push(id);
                    }
                }
                "reveal-on-load" => match positional(node, 0) {
                    Some(KdlValue::Bool(b)) => config.reveal_on_load = Some(*b),
                    _ => tracing::warn!("ignoring non-boolean reveal-on-load"),
                },
                other => tracing::warn!(node = %other, "ignoring unknown config node"),
            }
        }

        config
    }

    /// Add or replace a definition, keeping the original position.
    pub fn define(&mut self, def: FlagDefinition) {
        match self.flags.iter_mut().find(|d| d.id == def.id) {
            Some(existing) => *existing = def,
            None => self.flags.push(def),
        }
    }

    /// Merge a higher-precedence layer into this one.
    /// Definitions from `other` replace those with the same ID in `self`.
    pub fn merge(&mut self, other: &FlagConfig) {
        for def in &other.flags {
            self.define(def.clone());
        }
        for id in &other.dev_flags {
            if !self.dev_flags.contains(id) {
                self.dev_flags.push(id.clone());
            }
        }
        if other.reveal_on_load.is_some() {
            self.reveal_on_load = other.reveal_on_load;
        }
    }
}

/// Nth positional (unnamed) argument of a node.
fn positional(node: &KdlNode, index: usize) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .nth(index)
        .map(KdlEntry::value)
}

fn first_string(node: &KdlNode) -> Option<&str> {
    positional(node, 0).and_then(KdlValue::as_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kdl: &str) -> FlagConfig {
        FlagConfig::from_kdl(&kdl.parse::<KdlDocument>().unwrap())
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
flag "disableHome" #false
flag "disableProjects" #true
flag "experimentalThing"
dev-flag "devOnlyWidget"
reveal-on-load #true
"#,
        );

        assert_eq!(config.flags.len(), 3);
        assert_eq!(config.flags[0].id.as_str(), "disableHome");
        assert_eq!(config.flags[0].default, Some(false));
        assert_eq!(config.flags[1].default, Some(true));
        assert_eq!(config.flags[2].default, None);
        assert_eq!(config.dev_flags.len(), 1);
        assert_eq!(config.reveal_on_load, Some(true));
    }

    #[test]
    fn test_parse_drops_malformed_default() {
        let config = parse(
            r#"
flag "a" "yes"
flag "b" #true
"#,
        );

        assert_eq!(config.flags.len(), 2);
        assert_eq!(config.flags[0].default, None);
        assert_eq!(config.flags[1].default, Some(true));
    }

    #[test]
    fn test_parse_skips_nameless_flags() {
        let config = parse(
            r#"
flag
flag ""
flag "ok" #false
"#,
        );

        assert_eq!(config.flags.len(), 1);
        assert_eq!(config.flags[0].id.as_str(), "ok");
    }

    #[test]
    fn test_duplicate_flag_last_wins() {
        let config = parse(
            r#"
flag "a" #true
flag "b"
flag "a" #false
"#,
        );

        assert_eq!(config.flags.len(), 2);
        assert_eq!(config.flags[0].id.as_str(), "a");
        assert_eq!(config.flags[0].default, Some(false));
    }

    #[test]
    fn test_merge_replaces_defaults() {
        let mut system = parse(
            r#"
flag "a" #true
flag "b" #true
dev-flag "x"
reveal-on-load #false
"#,
        );
        let project = parse(
            r#"
flag "b" #false
flag "c"
dev-flag "x"
dev-flag "y"
"#,
        );

        system.merge(&project);

        let defaults: Vec<_> = system
            .flags
            .iter()
            .map(|d| (d.id.as_str(), d.default))
            .collect();
        assert_eq!(
            defaults,
            vec![("a", Some(true)), ("b", Some(false)), ("c", None)]
        );
        assert_eq!(system.dev_flags.len(), 2);
        // Project didn't set reveal-on-load, system value stays
        assert_eq!(system.reveal_on_load, Some(false));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(FlagConfig::load(&dir.path().join("nope.kdl")).unwrap().is_none());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("flags.kdl");
        std::fs::write(&path, "flag \"a\" #true\n").unwrap();

        let loaded = FlagConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded.flags, vec![FlagDefinition::new(FlagId::new("a").unwrap(), Some(true))]);
    }

    #[test]
    fn test_load_unreadable_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("flags.kdl");
        std::fs::create_dir(&path).unwrap();

        let err = FlagConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_load_invalid_kdl_is_kdl_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("flags.kdl");
        std::fs::write(&path, "flag \"unterminated").unwrap();

        let err = FlagConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Kdl(_)), "got {:?}", err);
    }
}
