//! Inbound payload parsing and validation.
//!
//! The body is decoded into a loose `serde_json::Value` first so the relay can
//! tell apart "not JSON", "missing field" and "field has the wrong shape",
//! which map to different responses.

use serde_json::Value;

use crate::relay::error::{FieldTypeError, RelayError};

/// Required payload keys, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["server", "tc", "emote_id", "uids"];

/// A validated emote join command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteJoin {
    /// Base URL of the emote server.
    pub server: String,
    /// Opaque token passed through to the server.
    pub tc: String,
    pub emote_id: String,
    /// One slot per inbound entry. `None` marks an entry that is skipped but
    /// still occupies its position.
    pub uids: Vec<Option<String>>,
}

impl EmoteJoin {
    /// Decode and validate a raw request body.
    ///
    /// Fails with [`RelayError::InvalidInput`] for undecodable or falsy JSON,
    /// [`RelayError::MissingField`] for the first absent key, and
    /// [`RelayError::Internal`] when a present field has an unusable type.
    pub fn from_body(body: &[u8]) -> Result<Self, RelayError> {
        let data: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidInput)?;
        if !is_truthy(&data) {
            return Err(RelayError::InvalidInput);
        }

        for field in REQUIRED_FIELDS {
            if matches!(data.get(field), None | Some(Value::Null)) {
                return Err(RelayError::MissingField(field));
            }
        }

        Self::from_value(&data).map_err(|e| RelayError::internal(&e))
    }

    fn from_value(data: &Value) -> Result<Self, FieldTypeError> {
        let uids = match &data["uids"] {
            Value::Array(entries) => entries
                .iter()
                .map(uid_slot)
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(FieldTypeError {
                    field: "uids",
                    problem: "must be an array",
                })
            }
        };

        Ok(Self {
            server: scalar_text(&data["server"], "server")?,
            tc: scalar_text(&data["tc"], "tc")?,
            emote_id: scalar_text(&data["emote_id"], "emote_id")?,
            uids,
        })
    }
}

/// Render a scalar JSON value as text the way a loosely typed form field would.
fn scalar_text(value: &Value, field: &'static str) -> Result<String, FieldTypeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(FieldTypeError {
            field,
            problem: "must be a scalar value",
        }),
    }
}

/// One `uids` entry as a positional slot; falsy entries leave the slot empty.
fn uid_slot(entry: &Value) -> Result<Option<String>, FieldTypeError> {
    if let Value::Number(n) = entry {
        if n.as_f64() == Some(0.0) {
            return Ok(None);
        }
    }
    let text = scalar_text(entry, "uids")?;
    Ok(Some(text.trim().to_string()).filter(|uid| is_present(uid)))
}

/// Empty strings and `"0"` count as absent uid entries.
fn is_present(text: &str) -> bool {
    !text.is_empty() && text != "0"
}

/// Whether a decoded body carries anything at all.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => is_present(s),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
