//! Data models for Flagdeck.
//!
//! This module defines the core data structures:
//! - `FlagId` - A validated, non-empty flag identifier
//! - `FlagDefinition` - A registry entry with its configured default
//! - `FlagGroup` - Which display group a flag belongs to
//! - `ValueSource` - Which layer produced a flag's effective value
//! - `ResolvedFlag` - The effective value of a flag plus its override marker

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Session overrides keyed by flag ID. Absence means "not overridden".
pub type OverrideMap = BTreeMap<String, bool>;

/// A non-empty flag identifier.
///
/// Flag IDs are open-ended strings: any non-empty name is accepted, whether
/// or not it appears in the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagId(String);

impl FlagId {
    /// Validate and wrap a flag name. The name is kept exactly as given;
    /// only the empty string is rejected.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(Error::InvalidFlagId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FlagId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FlagId> for String {
    fn from(id: FlagId) -> Self {
        id.0
    }
}

impl Borrow<str> for FlagId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FlagId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flag the application statically knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// Flag identifier
    pub id: FlagId,

    /// Configured default, or `None` when the configuration leaves it unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl FlagDefinition {
    /// Create a new definition.
    pub fn new(id: FlagId, default: Option<bool>) -> Self {
        Self { id, default }
    }
}

/// Display group of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagGroup {
    /// Present in the registry, defaults come from configuration
    Defined,
    /// Discovered outside the registry, defaults to inactive
    Dev,
}

impl fmt::Display for FlagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagGroup::Defined => write!(f, "defined"),
            FlagGroup::Dev => write!(f, "dev"),
        }
    }
}

/// Tracks which layer produced an effective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Value from the session override map
    Override,
    /// Value from the configured registry default
    Config,
    /// No layer supplied a value
    Unset,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Override => write!(f, "override"),
            ValueSource::Config => write!(f, "config"),
            ValueSource::Unset => write!(f, "unset"),
        }
    }
}

/// The effective state of one flag at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFlag {
    /// Flag identifier
    pub id: String,

    /// Display group
    pub group: FlagGroup,

    /// Effective value (`None` when neither an override nor a default exists)
    pub value: Option<bool>,

    /// Whether the session override map holds an entry for this flag
    pub overridden: bool,

    /// Layer that produced `value`
    pub source: ValueSource,
}

impl ResolvedFlag {
    /// Render the value column: `"true"`, `"false (overridden)"`, or `""`.
    pub fn label(&self) -> String {
        let value = self.value.map(|v| v.to_string()).unwrap_or_default();
        if self.overridden {
            format!("{} (overridden)", value)
        } else {
            value
        }
    }
}

/// Parse an override value as typed by an operator.
///
/// `true`/`on`/`1` and `false`/`off`/`0` map to a value; `unset`, `none` and
/// the empty string map to `None`, which clears the override.
pub fn parse_override_value(s: &str) -> Result<Option<bool>> {
    match s.trim().to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(Some(true)),
        "false" | "off" | "0" => Ok(Some(false)),
        "unset" | "none" | "" => Ok(None),
        other => Err(Error::InvalidInput(format!(
            "override value must be true, false or unset, got: {}",
            other
        ))),
    }
}
