//! Override controller: the only mutation surface for a flag session.
//!
//! A session owns the override store and the visibility state of the override
//! editor. Registry and dev flags are snapshots taken when the session starts.
//!
//! Mutations queue [`SessionSignal`]s. An external persistence channel drains
//! them with [`FlagSession::take_signals`] and decides what to write; the
//! session itself never performs IO.

use super::{DevFlagSet, FlagRegistry, FlagResolver, SessionOverrideStore};
use crate::Result;
use crate::models::{FlagId, OverrideMap, ResolvedFlag};
use serde::{Deserialize, Serialize};

/// Whether the override editor is exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// Intent emitted by a session for an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum SessionSignal {
    /// The override map changed and should be re-exported
    OverridesChanged,
    /// The editor was opened (`expose = true`) or closed; the channel that
    /// carries overrides across navigation should follow
    PersistIntent { expose: bool },
}

/// Start-up inputs supplied by collaborators.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Overrides imported from a persistence channel
    pub seed: OverrideMap,
    /// Start with the editor visible
    pub force_visible: bool,
}

/// A development session over a flag registry.
#[derive(Debug, Clone)]
pub struct FlagSession {
    registry: FlagRegistry,
    dev_flags: DevFlagSet,
    store: SessionOverrideStore,
    visibility: Visibility,
    banner_dismissed: bool,
    signals: Vec<SessionSignal>,
}

impl FlagSession {
    /// Start an empty session with the editor hidden.
    pub fn new(registry: FlagRegistry, dev_flags: DevFlagSet) -> Self {
        Self::start(registry, dev_flags, SessionOptions::default())
    }

    /// Start a session from imported overrides.
    pub fn start(registry: FlagRegistry, dev_flags: DevFlagSet, options: SessionOptions) -> Self {
        Self {
            registry,
            dev_flags,
            store: SessionOverrideStore::seeded(options.seed),
            visibility: Visibility::from(options.force_visible),
            banner_dismissed: false,
            signals: Vec::new(),
        }
    }

    /// Read view over the current state.
    pub fn resolver(&self) -> FlagResolver<'_> {
        FlagResolver::new(&self.registry, &self.dev_flags, &self.store)
    }

    pub fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    pub fn dev_flags(&self) -> &DevFlagSet {
        &self.dev_flags
    }

    pub fn store(&self) -> &SessionOverrideStore {
        &self.store
    }

    /// Override if present, else `registry_default`.
    pub fn resolve(&self, id: &str, registry_default: Option<bool>) -> Option<bool> {
        self.resolver().resolve(id, registry_default)
    }

    pub fn describe(&self, id: &str) -> ResolvedFlag {
        self.resolver().describe(id)
    }

    pub fn list_defined_flags(&self) -> Vec<String> {
        self.resolver().list_defined_flags()
    }

    pub fn list_dev_flags(&self) -> Vec<String> {
        self.resolver().list_dev_flags()
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.store.is_overridden(id)
    }

    pub fn has_any(&self) -> bool {
        self.store.has_any()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Serializable snapshot of the override map.
    pub fn export(&self) -> OverrideMap {
        self.store.export()
    }

    /// Set (`Some`) or clear (`None`) one override.
    ///
    /// Any non-empty flag name is accepted, registered or not.
    pub fn set_override(&mut self, id: impl AsRef<str>, value: Option<bool>) -> Result<()> {
        let id = FlagId::new(id)?;
        if self.store.set(&id, value) {
            tracing::debug!(flag = %id, ?value, "override updated");
            self.signals.push(SessionSignal::OverridesChanged);
        }
        Ok(())
    }

    /// Merge imported overrides into the session.
    ///
    /// Entries with an invalid flag name are skipped.
    pub fn apply_overrides(&mut self, overrides: &OverrideMap) {
        let mut changed = false;
        for (name, value) in overrides {
            match FlagId::new(name) {
                Ok(id) => changed |= self.store.set(&id, Some(*value)),
                Err(e) => tracing::warn!("skipping imported override: {}", e),
            }
        }
        if changed {
            self.signals.push(SessionSignal::OverridesChanged);
        }
    }

    /// Clear every override. With `also_hide`, the editor is hidden too.
    ///
    /// Calling this on an empty session leaves it empty.
    pub fn reset_overrides(&mut self, also_hide: bool) {
        if self.store.clear() {
            tracing::debug!("overrides reset");
            self.signals.push(SessionSignal::OverridesChanged);
        }
        if also_hide {
            self.visibility = Visibility::Hidden;
        }
    }

    /// Open or close the override editor.
    pub fn set_visibility(&mut self, visible: bool) {
        self.visibility = Visibility::from(visible);
        self.signals
            .push(SessionSignal::PersistIntent { expose: visible });
    }

    /// Whether the "flags are overridden" banner should show.
    pub fn banner_visible(&self) -> bool {
        self.store.has_any() && !self.banner_dismissed
    }

    /// Hide the banner for the rest of this session. Overrides stay active.
    pub fn dismiss_banner(&mut self) {
        self.banner_dismissed = true;
    }

    /// Drain queued signals in emission order.
    pub fn take_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }
}
