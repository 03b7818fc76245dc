//! Override map transports.
//!
//! These encode a session's overrides for channels that outlive a single
//! process or page load:
//!
//! - `json`: a JSON object, `{"disableHome": true}` (session storage)
//! - `query`: comma-separated pairs, `disableHome=true,devThing=false`
//!   (a URL query parameter). Flag names are percent-encoded, so a name
//!   containing `,` or `=` cannot bleed into a neighbouring entry.
//!
//! Decoding is lenient. An entry whose value is not a boolean, or whose key is
//! empty or not valid percent-encoded UTF-8, is dropped with a warning and the
//! rest of the map still loads.

use crate::models::OverrideMap;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding used by an external persistence channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideFormat {
    #[default]
    Json,
    Query,
}

impl OverrideFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OverrideFormat::Json),
            "query" => Some(OverrideFormat::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideFormat::Json => "json",
            OverrideFormat::Query => "query",
        }
    }

    /// Encode an override map.
    pub fn encode(&self, overrides: &OverrideMap) -> Result<String> {
        match self {
            OverrideFormat::Json => to_json(overrides),
            OverrideFormat::Query => Ok(to_query(overrides)),
        }
    }

    /// Decode an override map, dropping malformed entries.
    pub fn decode(&self, data: &str) -> Result<OverrideMap> {
        match self {
            OverrideFormat::Json => from_json(data),
            OverrideFormat::Query => Ok(from_query(data)),
        }
    }
}

impl fmt::Display for OverrideFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode as a JSON object.
pub fn to_json(overrides: &OverrideMap) -> Result<String> {
    Ok(serde_json::to_string(overrides)?)
}

/// Decode a JSON object.
///
/// Only a document that is not a JSON object at all is an error; individual
/// entries with non-boolean values are dropped.
pub fn from_json(data: &str) -> Result<OverrideMap> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    let object = value.as_object().ok_or_else(|| {
        Error::InvalidInput(format!("override data must be a JSON object, got: {}", value))
    })?;

    let mut overrides = OverrideMap::new();
    for (key, value) in object {
        if key.is_empty() {
            tracing::warn!("dropping override with empty flag name");
            continue;
        }
        match value.as_bool() {
            Some(v) => {
                overrides.insert(key.clone(), v);
            }
            None => tracing::warn!(flag = %key, %value, "dropping malformed override value"),
        }
    }
    Ok(overrides)
}

/// Encode as `a=true,b=false`, percent-encoding each flag name.
pub fn to_query(overrides: &OverrideMap) -> String {
    overrides
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode `a=true,b=false`. Never fails.
pub fn from_query(data: &str) -> OverrideMap {
    let mut overrides = OverrideMap::new();
    for pair in data.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            tracing::warn!(entry = %pair, "dropping override without a value");
            continue;
        };
        let key = match urlencoding::decode(key) {
            Ok(key) if !key.is_empty() => key.into_owned(),
            Ok(_) => {
                tracing::warn!(entry = %pair, "dropping override with empty flag name");
                continue;
            }
            Err(e) => {
                tracing::warn!(entry = %pair, error = %e, "dropping override with undecodable flag name");
                continue;
            }
        };
        match value.trim() {
            "true" => {
                overrides.insert(key, true);
            }
            "false" => {
                overrides.insert(key, false);
            }
            other => tracing::warn!(flag = %key, value = %other, "dropping malformed override value"),
        }
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, bool)]) -> OverrideMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_json_drops_malformed_entries() {
        let decoded = from_json(r#"{"a": true, "b": "yes", "c": null, "d": false, "": true}"#).unwrap();
        assert_eq!(decoded, map(&[("a", true), ("d", false)]));
    }

    #[test]
    fn test_json_rejects_non_object() {
        assert!(matches!(from_json("[true]"), Err(Error::InvalidInput(_))));
        assert!(matches!(from_json("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_json_encode() {
        let encoded = to_json(&map(&[("b", false), ("a", true)])).unwrap();
        assert_eq!(encoded, r#"{"a":true,"b":false}"#);
    }

    #[test]
    fn test_query_encode() {
        assert_eq!(to_query(&map(&[("b", false), ("a", true)])), "a=true,b=false");
        assert_eq!(to_query(&OverrideMap::new()), "");
    }

    #[test]
    fn test_query_drops_malformed_entries() {
        let decoded = from_query("a=true, b=maybe,c,=true,d=false,,");
        assert_eq!(decoded, map(&[("a", true), ("d", false)]));
    }

    #[test]
    fn test_query_escapes_separators_in_names() {
        let overrides = map(&[("a,b", true), ("k=v", false), ("plain", true)]);

        let encoded = to_query(&overrides);
        assert_eq!(encoded, "a%2Cb=true,k%3Dv=false,plain=true");
        assert_eq!(from_query(&encoded), overrides);
    }

    #[test]
    fn test_unusual_names_survive_both_transports() {
        let overrides = map(&[
            (" padded", true),
            (" ", false),
            ("a,b", true),
            ("k=v", false),
            ("100%", true),
            ("drapeau-été", false),
            ("旗", true),
        ]);

        for format in [OverrideFormat::Json, OverrideFormat::Query] {
            let encoded = format.encode(&overrides).unwrap();
            assert_eq!(format.decode(&encoded).unwrap(), overrides, "{}", format);
        }
    }

    #[test]
    fn test_query_drops_undecodable_name() {
        // %FF is not valid UTF-8
        assert_eq!(from_query("%FF=true,ok=false"), map(&[("ok", false)]));
    }

    #[test]
    fn test_json_keeps_names_verbatim() {
        let decoded = from_json(r#"{" padded": true, "padded": false}"#).unwrap();
        assert_eq!(decoded, map(&[(" padded", true), ("padded", false)]));
    }

    #[test]
    fn test_query_last_entry_wins() {
        assert_eq!(from_query("a=true,a=false"), map(&[("a", false)]));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OverrideFormat::parse("JSON"), Some(OverrideFormat::Json));
        assert_eq!(OverrideFormat::parse("query"), Some(OverrideFormat::Query));
        assert_eq!(OverrideFormat::parse("yaml"), None);
    }

    #[test]
    fn test_format_decode_dispatch() {
        let decoded = OverrideFormat::Query.decode("x=true").unwrap();
        assert_eq!(decoded, map(&[("x", true)]));
        let decoded = OverrideFormat::Json.decode(r#"{"x": false}"#).unwrap();
        assert_eq!(decoded, map(&[("x", false)]));
    }
}
