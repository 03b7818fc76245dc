//! JavaScript bindings for a browser override editor
//!
//! This module exposes [`FlagDeck`], a handle around [`FlagSession`] that a
//! web UI drives directly. Collections cross the boundary as JSON strings:
//!
//! - `defined`: `["disableHome", "disableProjects"]`
//! - `config`: `{"disableHome": false, "disableProjects": true}`; entries
//!   that are not booleans count as unset defaults
//! - `overrides`: the session-storage encoding from [`crate::persist`]

use crate::flags::{DevFlagSet, FlagRegistry, FlagSession, SessionOptions};
use crate::models::{FlagDefinition, FlagGroup, FlagId};
use crate::persist;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser-side flag session.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug)]
pub struct FlagDeck {
    session: FlagSession,
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl FlagDeck {
    /// Start a session.
    ///
    /// `overrides` may be empty when nothing was carried over from a previous
    /// page load. With `force_visible` the editor starts open.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn new(
        defined: &str,
        config: &str,
        dev_flags: &str,
        overrides: &str,
        force_visible: bool,
    ) -> Result<FlagDeck, String> {
        let defined: Vec<String> = serde_json::from_str(defined).map_err(|e| e.to_string())?;
        let config: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(config).map_err(|e| e.to_string())?;
        let dev_names: Vec<String> = serde_json::from_str(dev_flags).map_err(|e| e.to_string())?;

        let definitions = defined
            .iter()
            .map(|name| {
                let id = FlagId::new(name)?;
                let default = config.get(id.as_str()).and_then(serde_json::Value::as_bool);
                Ok(FlagDefinition::new(id, default))
            })
            .collect::<crate::Result<Vec<_>>>()
            .map_err(|e| e.to_string())?;
        let registry = FlagRegistry::from_definitions(definitions).map_err(|e| e.to_string())?;
        let dev = DevFlagSet::from_names(dev_names).map_err(|e| e.to_string())?;

        let seed = if overrides.trim().is_empty() {
            Default::default()
        } else {
            persist::from_json(overrides).map_err(|e| e.to_string())?
        };

        Ok(FlagDeck {
            session: FlagSession::start(
                registry,
                dev,
                SessionOptions {
                    seed,
                    force_visible,
                },
            ),
        })
    }

    /// Effective value; `undefined` when neither an override nor a default exists.
    pub fn value(&self, flag: &str) -> Option<bool> {
        self.session.resolver().effective(flag)
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = isOverridden))]
    pub fn is_overridden(&self, flag: &str) -> bool {
        self.session.is_overridden(flag)
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = hasOverrides))]
    pub fn has_overrides(&self) -> bool {
        self.session.has_any()
    }

    /// Checkbox change: `true`/`false` overrides, `undefined` clears.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = setOverride))]
    pub fn set_override(&mut self, flag: &str, value: Option<bool>) -> Result<(), String> {
        self.session
            .set_override(flag, value)
            .map_err(|e| e.to_string())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = resetOverrides))]
    pub fn reset_overrides(&mut self, also_hide: bool) {
        self.session.reset_overrides(also_hide);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = setVisible))]
    pub fn set_visible(&mut self, visible: bool) {
        self.session.set_visibility(visible);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = isVisible))]
    pub fn is_visible(&self) -> bool {
        self.session.visibility().is_visible()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = bannerVisible))]
    pub fn banner_visible(&self) -> bool {
        self.session.banner_visible()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = dismissBanner))]
    pub fn dismiss_banner(&mut self) {
        self.session.dismiss_banner();
    }

    /// Resolved entries of one group (`"defined"` or `"dev"`) as a JSON array.
    pub fn entries(&self, group: &str) -> Result<String, String> {
        let group = match group {
            "defined" => FlagGroup::Defined,
            "dev" => FlagGroup::Dev,
            other => return Err(format!("unknown flag group: {}", other)),
        };
        serde_json::to_string(&self.session.resolver().entries(group)).map_err(|e| e.to_string())
    }

    /// Overrides in the session-storage encoding.
    pub fn export(&self) -> Result<String, String> {
        persist::to_json(&self.session.export()).map_err(|e| e.to_string())
    }

    /// Pending signals as a JSON array, oldest first.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = takeSignals))]
    pub fn take_signals(&mut self) -> Result<String, String> {
        serde_json::to_string(&self.session.take_signals()).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> FlagDeck {
        FlagDeck::new(
            r#"["disableHome", "disableProjects"]"#,
            r#"{"disableHome": false, "disableProjects": "sometimes"}"#,
            r#"["devWidget", "disableHome"]"#,
            "",
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_deck_defaults() {
        let deck = deck();
        assert_eq!(deck.value("disableHome"), Some(false));
        // Non-boolean config value counts as unset
        assert_eq!(deck.value("disableProjects"), None);
        assert_eq!(deck.value("devWidget"), None);
        assert!(!deck.has_overrides());
        assert!(!deck.is_visible());
    }

    #[test]
    fn test_deck_dev_entries_exclude_defined() {
        let deck = deck();
        let dev: Vec<serde_json::Value> =
            serde_json::from_str(&deck.entries("dev").unwrap()).unwrap();
        assert_eq!(dev.len(), 1);
        assert_eq!(dev[0]["id"], "devWidget");
        assert!(deck.entries("other").is_err());
    }

    #[test]
    fn test_deck_checkbox_flow() {
        let mut deck = deck();
        deck.set_visible(true);
        deck.set_override("disableHome", Some(true)).unwrap();
        assert_eq!(deck.value("disableHome"), Some(true));
        assert!(deck.banner_visible());
        assert_eq!(deck.export().unwrap(), r#"{"disableHome":true}"#);

        // Indeterminate checkbox clears the override
        deck.set_override("disableHome", None).unwrap();
        assert!(!deck.is_overridden("disableHome"));
        assert_eq!(deck.value("disableHome"), Some(false));

        deck.set_override("devWidget", Some(true)).unwrap();
        deck.reset_overrides(true);
        assert!(!deck.has_overrides());
        assert!(!deck.is_visible());

        let signals: Vec<serde_json::Value> =
            serde_json::from_str(&deck.take_signals().unwrap()).unwrap();
        assert_eq!(signals[0]["signal"], "persist_intent");
        assert_eq!(signals[0]["expose"], true);
    }

    #[test]
    fn test_deck_seeded_from_previous_load() {
        let deck = FlagDeck::new(
            r#"["a"]"#,
            r#"{"a": true}"#,
            "[]",
            r#"{"a": false, "b": 3}"#,
            true,
        )
        .unwrap();

        assert_eq!(deck.value("a"), Some(false));
        assert!(!deck.is_overridden("b"));
        assert!(deck.is_visible());
    }

    #[test]
    fn test_deck_rejects_bad_catalog() {
        assert!(FlagDeck::new("not json", "{}", "[]", "", false).is_err());
        assert!(FlagDeck::new(r#"["a", "a"]"#, "{}", "[]", "", false).is_err());
    }
}
