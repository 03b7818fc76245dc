//! Effective value computation.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Session override
//! 2. Registry default (defined flags only)
//! 3. Absent
//!
//! Nothing here is cached: every call reads the current override map, so a
//! write through [`FlagSession`](super::FlagSession) is visible to the very
//! next read.

use super::{DevFlagSet, FlagRegistry, SessionOverrideStore};
use crate::models::{FlagGroup, ResolvedFlag, ValueSource};

/// Read-only view over the three flag layers.
#[derive(Debug, Clone, Copy)]
pub struct FlagResolver<'a> {
    registry: &'a FlagRegistry,
    dev_flags: &'a DevFlagSet,
    overrides: &'a SessionOverrideStore,
}

impl<'a> FlagResolver<'a> {
    pub fn new(
        registry: &'a FlagRegistry,
        dev_flags: &'a DevFlagSet,
        overrides: &'a SessionOverrideStore,
    ) -> Self {
        Self {
            registry,
            dev_flags,
            overrides,
        }
    }

    /// Override if present, else the supplied default.
    pub fn resolve(&self, id: &str, registry_default: Option<bool>) -> Option<bool> {
        self.overrides.get(id).or(registry_default)
    }

    /// Effective value using the registry's own default for `id`.
    pub fn effective(&self, id: &str) -> Option<bool> {
        self.resolve(id, self.registry.default_for(id))
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.overrides.is_overridden(id)
    }

    /// Registry flags in lexicographic order.
    pub fn list_defined_flags(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.ids().map(str::to_string).collect();
        ids.sort();
        ids
    }

    /// Dev flags not already in the registry, in lexicographic order.
    pub fn list_dev_flags(&self) -> Vec<String> {
        // DevFlagSet iterates in sorted order already
        self.dev_flags
            .iter()
            .filter(|id| !self.registry.contains(id))
            .map(str::to_string)
            .collect()
    }

    /// Group a flag would be displayed in, or `None` if neither layer knows it.
    pub fn group_of(&self, id: &str) -> Option<FlagGroup> {
        if self.registry.contains(id) {
            Some(FlagGroup::Defined)
        } else if self.dev_flags.contains(id) {
            Some(FlagGroup::Dev)
        } else {
            None
        }
    }

    /// Full resolution of one flag.
    ///
    /// Flags unknown to both the registry and the dev set still resolve; they
    /// are reported in the dev group since that is where an ad hoc override
    /// would surface.
    pub fn describe(&self, id: &str) -> ResolvedFlag {
        let group = self.group_of(id).unwrap_or(FlagGroup::Dev);
        let default = match group {
            FlagGroup::Defined => self.registry.default_for(id),
            FlagGroup::Dev => None,
        };

        let (value, source) = match self.overrides.get(id) {
            Some(v) => (Some(v), ValueSource::Override),
            None => match default {
                Some(v) => (Some(v), ValueSource::Config),
                None => (None, ValueSource::Unset),
            },
        };

        ResolvedFlag {
            id: id.to_string(),
            group,
            value,
            overridden: self.overrides.is_overridden(id),
            source,
        }
    }

    /// Resolved entries for one display group, in presentation order.
    pub fn entries(&self, group: FlagGroup) -> Vec<ResolvedFlag> {
        let ids = match group {
            FlagGroup::Defined => self.list_defined_flags(),
            FlagGroup::Dev => self.list_dev_flags(),
        };
        ids.iter().map(|id| self.describe(id)).collect()
    }

    /// Overrides whose flag is in neither group.
    pub fn unlisted_overrides(&self) -> Vec<String> {
        self.overrides
            .iter()
            .map(|(id, _)| id)
            .filter(|id| self.group_of(id).is_none())
            .map(str::to_string)
            .collect()
    }
}
