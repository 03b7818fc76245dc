//! Command implementations for Flagdeck CLI.
//!
//! Each command opens the project's flag session, applies its change through
//! [`FlagSession`], and writes the session back when the session signals that
//! something changed. Results implement [`Output`] for JSON or human display.

use crate::config::{ConfigOverrides, ConfigSource, LoadedLayer, ResolvedCatalog, resolve_catalog};
use crate::flags::{FlagSession, SessionSignal, Visibility};
use crate::models::{FlagGroup, ResolvedFlag};
use crate::persist::OverrideFormat;
use crate::storage::{SessionFile, SessionSnapshot};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// A project's catalog and its session, loaded together.
#[derive(Debug)]
pub struct Workspace {
    pub catalog: ResolvedCatalog,
    pub file: SessionFile,
    pub session: FlagSession,
    pub started_at: DateTime<Utc>,
    /// Whether a session file existed when the workspace was opened
    pub resumed: bool,
}

impl Workspace {
    /// Resolve the catalog and resume (or start) the project's session.
    pub fn open(project_root: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let catalog = resolve_catalog(project_root, overrides)?;
        let file = SessionFile::for_project(project_root)?;
        Self::open_with(catalog, file)
    }

    /// Open against an explicit catalog and session file.
    pub fn open_with(catalog: ResolvedCatalog, file: SessionFile) -> Result<Self> {
        let (session, started_at, resumed) = match file.load()? {
            Some(snapshot) => {
                // A resumed session keeps its own visibility; reveal-on-load
                // only applies to the load that starts it.
                let mut session = catalog.start_session(snapshot.overrides);
                if session.visibility() != snapshot.visibility {
                    session.set_visibility(snapshot.visibility.is_visible());
                    session.take_signals();
                }
                (session, snapshot.started_at, true)
            }
            None => (catalog.start_session(Default::default()), Utc::now(), false),
        };

        Ok(Self {
            catalog,
            file,
            session,
            started_at,
            resumed,
        })
    }

    /// Persist the session if it emitted any signal since the last call.
    pub fn sync(&mut self) -> Result<Vec<SessionSignal>> {
        let signals = self.session.take_signals();
        if signals.is_empty() {
            return Ok(signals);
        }
        for signal in &signals {
            tracing::debug!(?signal, "session signal");
        }
        self.file.save(&self.snapshot())?;
        Ok(signals)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            started_at: self.started_at,
            visibility: self.session.visibility(),
            overrides: self.session.export(),
        }
    }
}

// ==================== list ====================

#[derive(Debug, Serialize)]
pub struct FlagList {
    pub defined: Vec<ResolvedFlag>,
    pub dev: Vec<ResolvedFlag>,
    /// Overrides for flags neither the catalog nor the dev set knows about
    pub unlisted: Vec<ResolvedFlag>,
    pub has_overrides: bool,
    pub visible: bool,
}

impl Output for FlagList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Feature Flags".to_string());
        lines.push("  Feature flags default to the values defined in the config.".to_string());
        if self.defined.is_empty() {
            lines.push("  (none defined)".to_string());
        }
        for flag in &self.defined {
            lines.push(format_flag_line(flag));
        }

        if !self.dev.is_empty() {
            lines.push(String::new());
            lines.push("Dev Flags".to_string());
            lines.push(
                "  Dev flags default to inactive and can only be changed for the current session."
                    .to_string(),
            );
            for flag in &self.dev {
                lines.push(format_flag_line(flag));
            }
        }

        if !self.unlisted.is_empty() {
            lines.push(String::new());
            lines.push("Other Overrides".to_string());
            for flag in &self.unlisted {
                lines.push(format_flag_line(flag));
            }
        }

        if self.has_overrides {
            lines.push(String::new());
            lines.push("Feature flags are overridden in the current session.".to_string());
        }

        lines.join("\n")
    }
}

fn format_flag_line(flag: &ResolvedFlag) -> String {
    let mark = match flag.value {
        Some(true) => "[x]",
        Some(false) => "[ ]",
        None => "[-]",
    };
    format!("  {} {:<32} {}", mark, flag.id, flag.label())
}

/// List every flag in both display groups.
pub fn list(ws: &Workspace) -> FlagList {
    let resolver = ws.session.resolver();
    FlagList {
        defined: resolver.entries(FlagGroup::Defined),
        dev: resolver.entries(FlagGroup::Dev),
        unlisted: resolver
            .unlisted_overrides()
            .iter()
            .map(|id| resolver.describe(id))
            .collect(),
        has_overrides: ws.session.has_any(),
        visible: ws.session.visibility().is_visible(),
    }
}

// ==================== get / set ====================

#[derive(Debug, Serialize)]
pub struct FlagResult {
    #[serde(flatten)]
    pub flag: ResolvedFlag,
    /// Whether the flag is in the catalog or the dev set
    pub known: bool,
}

impl Output for FlagResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let value = self.flag.label();
        let value = if value.is_empty() { "(unset)".to_string() } else { value };
        let mut out = format!("{} = {} [{}]", self.flag.id, value, self.flag.source);
        if !self.known {
            out.push_str("\nNote: flag is not in the catalog or the dev flag set.");
        }
        out
    }
}

/// Show the effective value of one flag.
pub fn get(ws: &Workspace, id: &str) -> FlagResult {
    let resolver = ws.session.resolver();
    FlagResult {
        flag: resolver.describe(id),
        known: resolver.group_of(id).is_some(),
    }
}

#[derive(Debug, Serialize)]
pub struct SetResult {
    #[serde(flatten)]
    pub flag: FlagResult,
    pub changed: bool,
}

impl Output for SetResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.changed {
            self.flag.to_human()
        } else {
            format!("{}\n(no change)", self.flag.to_human())
        }
    }
}

/// Set (`Some`) or clear (`None`) an override.
pub fn set(ws: &mut Workspace, id: &str, value: Option<bool>) -> Result<SetResult> {
    ws.session.set_override(id, value)?;
    let changed = !ws.sync()?.is_empty();
    Ok(SetResult {
        flag: get(ws, id),
        changed,
    })
}

// ==================== reset ====================

#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub cleared: usize,
    pub visible: bool,
}

impl Output for ResetResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match self.cleared {
            0 => "No overrides to reset.".to_string(),
            1 => "Reset 1 override back to defaults.".to_string(),
            n => format!("Reset {} overrides back to defaults.", n),
        }
    }
}

/// Clear every override, optionally hiding the editor.
pub fn reset(ws: &mut Workspace, hide: bool) -> Result<ResetResult> {
    let cleared = ws.session.store().len();
    let was_visible = ws.session.visibility();
    ws.session.reset_overrides(hide);
    ws.sync()?;
    // Hiding alone emits no signal; make sure the file follows
    if ws.session.visibility() != was_visible && ws.file.exists() {
        ws.file.save(&ws.snapshot())?;
    }
    Ok(ResetResult {
        cleared,
        visible: ws.session.visibility().is_visible(),
    })
}

// ==================== show / hide ====================

#[derive(Debug, Serialize)]
pub struct VisibilityResult {
    pub visibility: Visibility,
    /// Whether the persistence channel was asked to expose the overrides
    pub persist_requested: bool,
}

impl Output for VisibilityResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match self.visibility {
            Visibility::Visible => "Override editor is open.".to_string(),
            Visibility::Hidden => "Override editor is closed.".to_string(),
        }
    }
}

/// Open or close the override editor.
pub fn set_visibility(ws: &mut Workspace, visible: bool) -> Result<VisibilityResult> {
    ws.session.set_visibility(visible);
    let signals = ws.sync()?;
    let persist_requested = signals
        .iter()
        .any(|s| matches!(s, SessionSignal::PersistIntent { expose: true }));
    Ok(VisibilityResult {
        visibility: ws.session.visibility(),
        persist_requested,
    })
}

// ==================== status ====================

#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub session_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub has_overrides: bool,
    pub override_count: usize,
    pub visible: bool,
    pub banner: bool,
    pub reveal_on_load: bool,
    pub reveal_on_load_source: ConfigSource,
    pub session_path: String,
    pub config_layers: Vec<LoadedLayer>,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match self.started_at {
            Some(at) if self.session_active => {
                lines.push(format!("Session: active since {}", at.to_rfc3339()))
            }
            _ => lines.push("Session: none".to_string()),
        }
        lines.push(format!("Overrides: {}", self.override_count));
        lines.push(format!(
            "Editor: {}",
            if self.visible { "open" } else { "closed" }
        ));
        if self.banner {
            lines.push(
                "Feature flags are overridden in the current session. Run `flagdeck reset` to reset back to defaults."
                    .to_string(),
            );
        }
        lines.push(format!(
            "Reveal on load: {} [{}]",
            if self.reveal_on_load { "on" } else { "off" },
            self.reveal_on_load_source
        ));
        if self.config_layers.is_empty() {
            lines.push("Config: (no catalog files found)".to_string());
        }
        for layer in &self.config_layers {
            lines.push(format!("Config [{}]: {}", layer.source, layer.path.display()));
        }
        lines.join("\n")
    }
}

/// Summarize the session.
pub fn status(ws: &Workspace) -> StatusResult {
    StatusResult {
        session_active: ws.resumed,
        started_at: ws.resumed.then_some(ws.started_at),
        has_overrides: ws.session.has_any(),
        override_count: ws.session.store().len(),
        visible: ws.session.visibility().is_visible(),
        banner: ws.session.banner_visible(),
        reveal_on_load: ws.catalog.reveal_on_load.value,
        reveal_on_load_source: ws.catalog.reveal_on_load.source,
        session_path: ws.file.path().display().to_string(),
        config_layers: ws.catalog.layers.clone(),
    }
}

// ==================== export / import ====================

#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub format: OverrideFormat,
    pub data: String,
}

impl Output for ExportResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        self.data.clone()
    }
}

/// Encode the session's overrides for an external channel.
pub fn export(ws: &Workspace, format: OverrideFormat) -> Result<ExportResult> {
    Ok(ExportResult {
        format,
        data: format.encode(&ws.session.export())?,
    })
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    /// Well-formed entries found in the input
    pub imported: usize,
    /// Overrides active after the import
    pub total: usize,
}

impl Output for ImportResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Imported {} override(s); {} active.",
            self.imported, self.total
        )
    }
}

/// Merge encoded overrides into the session. Malformed entries are dropped.
pub fn import(ws: &mut Workspace, data: &str, format: OverrideFormat) -> Result<ImportResult> {
    let decoded = format.decode(data)?;
    if ws.file.exists() {
        ws.session.apply_overrides(&decoded);
        ws.sync()?;
    } else if !decoded.is_empty() {
        // Importing into a fresh session seeds it, so reveal-on-load applies
        ws.session = ws.catalog.start_session(decoded.clone());
        ws.file.save(&ws.snapshot())?;
    }
    Ok(ImportResult {
        imported: decoded.len(),
        total: ws.session.store().len(),
    })
}

// ==================== end ====================

#[derive(Debug, Serialize)]
pub struct EndResult {
    pub ended: bool,
}

impl Output for EndResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.ended {
            "Session ended. Overrides discarded.".to_string()
        } else {
            "No active session.".to_string()
        }
    }
}

/// End the session, discarding every override.
pub fn end(file: &SessionFile) -> Result<EndResult> {
    Ok(EndResult { ended: file.end()? })
}
