//! KDL schema for session.kdl.

use crate::flags::Visibility;
use crate::models::OverrideMap;
use chrono::{DateTime, Utc};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::Serialize;

/// Persisted state of one session.
///
/// # KDL Schema
///
/// ```kdl
/// started-at "2026-10-19T09:00:00Z"
/// visible #true
/// override "disableHome" #false
/// override "devOnlyWidget" #true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Visibility of the override editor
    pub visibility: Visibility,

    /// Active overrides
    pub overrides: OverrideMap,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSnapshot {
    /// A fresh session starting now.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            visibility: Visibility::Hidden,
            overrides: OverrideMap::new(),
        }
    }

    /// Parse a session file.
    ///
    /// An `override` node with a missing name or a non-boolean value is
    /// dropped; the remaining overrides still load.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut snapshot = Self::new();

        if let Some(s) = first_value(doc, "started-at").and_then(KdlValue::as_string) {
            if let Ok(dt) = s.parse::<DateTime<Utc>>() {
                snapshot.started_at = dt;
            }
        }

        if let Some(visible) = first_value(doc, "visible").and_then(KdlValue::as_bool) {
            snapshot.visibility = Visibility::from(visible);
        }

        for node in doc.nodes().iter().filter(|n| n.name().value() == "override") {
            let mut args = node.entries().iter().filter(|e| e.name().is_none());
            let name = args.next().and_then(|e| e.value().as_string());
            let value = args.next().map(KdlEntry::value);

            match (name, value) {
                (Some(name), Some(KdlValue::Bool(v))) if !name.is_empty() => {
                    snapshot.overrides.insert(name.to_string(), *v);
                }
                (name, value) => {
                    tracing::warn!(?name, ?value, "dropping malformed session override");
                }
            }
        }

        snapshot
    }

    /// Convert to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        let mut node = KdlNode::new("started-at");
        node.push(KdlEntry::new(KdlValue::String(self.started_at.to_rfc3339())));
        doc.nodes_mut().push(node);

        let mut node = KdlNode::new("visible");
        node.push(KdlEntry::new(KdlValue::Bool(self.visibility.is_visible())));
        doc.nodes_mut().push(node);

        for (id, value) in &self.overrides {
            let mut node = KdlNode::new("override");
            node.push(KdlEntry::new(KdlValue::String(id.clone())));
            node.push(KdlEntry::new(KdlValue::Bool(*value)));
            doc.nodes_mut().push(node);
        }

        doc.autoformat();
        doc
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(KdlEntry::value)
}
