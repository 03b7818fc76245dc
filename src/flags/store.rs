//! Session override map.

use crate::models::{FlagId, OverrideMap};

/// Holds the explicit overrides for the active session.
///
/// The map is strictly `flag -> bool`. Clearing an override removes the key;
/// there is no stored "unset" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOverrideStore {
    overrides: OverrideMap,
}

impl SessionOverrideStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from an imported map.
    pub fn seeded(overrides: OverrideMap) -> Self {
        Self { overrides }
    }

    /// Override value for a flag, if any.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.overrides.get(id).copied()
    }

    /// Insert, replace, or (with `None`) remove an override.
    ///
    /// Returns `true` if the map changed.
    pub fn set(&mut self, id: &FlagId, value: Option<bool>) -> bool {
        match value {
            Some(v) => self.overrides.insert(id.to_string(), v) != Some(v),
            None => self.overrides.remove(id.as_str()).is_some(),
        }
    }

    /// Remove every override. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_any = self.has_any();
        self.overrides.clear();
        had_any
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    /// Whether any override is active.
    pub fn has_any(&self) -> bool {
        !self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Snapshot of the override map for an external persistence channel.
    pub fn export(&self) -> OverrideMap {
        self.overrides.clone()
    }

    /// Iterate overrides in flag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
