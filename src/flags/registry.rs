//! Static flag catalog and dev flag discovery set.

use crate::models::{FlagDefinition, FlagId};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap};

/// The catalog of flags the application statically knows about.
///
/// Insertion order is preserved; presentation order is decided by the
/// resolver, which sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagRegistry {
    definitions: Vec<FlagDefinition>,
    index: HashMap<FlagId, usize>,
}

impl FlagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from definitions, rejecting duplicate IDs.
    pub fn from_definitions(definitions: Vec<FlagDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.id.clone(), i).is_some() {
                return Err(Error::DuplicateFlag(def.id.to_string()));
            }
        }
        Ok(Self { definitions, index })
    }

    /// Build a registry from `(name, default)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Option<bool>)>,
        S: AsRef<str>,
    {
        let definitions = pairs
            .into_iter()
            .map(|(id, default)| Ok(FlagDefinition::new(FlagId::new(id)?, default)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_definitions(definitions)
    }

    /// Check whether a flag is defined.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Configured default for a flag. `None` both for unknown flags and for
    /// defined flags whose default is unset.
    pub fn default_for(&self, id: &str) -> Option<bool> {
        self.index
            .get(id)
            .and_then(|&i| self.definitions[i].default)
    }

    /// Definitions in insertion order.
    pub fn definitions(&self) -> &[FlagDefinition] {
        &self.definitions
    }

    /// Flag IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Flags discovered outside the registry. They carry no default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevFlagSet {
    ids: BTreeSet<FlagId>,
}

impl DevFlagSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from flag names, validating each one.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = names
            .into_iter()
            .map(FlagId::new)
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { ids })
    }

    /// Record a discovered flag. Returns `false` if it was already known.
    pub fn insert(&mut self, id: FlagId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(FlagId::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
