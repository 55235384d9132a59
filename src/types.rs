use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SessionError;

/// Values that can appear in a result row or be bound as query parameters.
///
/// One enum covers both directions so callers never touch driver types:
/// ```rust
/// use pg_session::SqlValue;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Boolean view of the value; integer 0/1 is accepted as well since some
    /// result paths deliver booleans that way.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(0) => Some(false),
            SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamp view of the value; text in the common `YYYY-MM-DD HH:MM:SS`
    /// formats (with or without milliseconds) is parsed as a fallback.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let SqlValue::Bytes(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

/// Parameter type hints passed to statement preparation.
///
/// A closed set of the types the value enum can represent; `Unspecified`
/// leaves inference to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Varchar,
    Bool,
    Timestamp,
    Timestamptz,
    Json,
    Jsonb,
    Bytea,
    Unspecified,
}

impl SqlType {
    /// Wire-catalog name of the type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Int2 => "int2",
            SqlType::Int4 => "int4",
            SqlType::Int8 => "int8",
            SqlType::Float4 => "float4",
            SqlType::Float8 => "float8",
            SqlType::Text => "text",
            SqlType::Varchar => "varchar",
            SqlType::Bool => "bool",
            SqlType::Timestamp => "timestamp",
            SqlType::Timestamptz => "timestamptz",
            SqlType::Json => "json",
            SqlType::Jsonb => "jsonb",
            SqlType::Bytea => "bytea",
            SqlType::Unspecified => "unknown",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a named close operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    /// A named prepared statement.
    Statement,
    /// A named portal.
    Portal,
}

impl CloseKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseKind::Statement => "statement",
            CloseKind::Portal => "portal",
        }
    }
}

impl fmt::Display for CloseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloseKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statement" => Ok(CloseKind::Statement),
            "portal" => Ok(CloseKind::Portal),
            other => Err(SessionError::InvalidArgument(format!(
                "close kind must be \"statement\" or \"portal\", got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_kind_parses_known_values() {
        assert_eq!("statement".parse::<CloseKind>().unwrap(), CloseKind::Statement);
        assert_eq!("portal".parse::<CloseKind>().unwrap(), CloseKind::Portal);
    }

    #[test]
    fn close_kind_rejects_unknown_values() {
        let err = "cursor".parse::<CloseKind>().unwrap_err();
        assert!(matches!(err, SessionError::InvalidArgument(_)));
    }

    #[test]
    fn bool_view_accepts_zero_and_one() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(true));
        assert_eq!(SqlValue::Int(0).as_bool(), Some(false));
        assert_eq!(SqlValue::Int(2).as_bool(), None);
        assert_eq!(SqlValue::Bool(false).as_bool(), Some(false));
    }

    #[test]
    fn timestamp_view_parses_text_fallbacks() {
        let v = SqlValue::Text("2021-08-06 16:00:00".into());
        assert!(v.as_timestamp().is_some());
        assert!(SqlValue::Text("not a time".into()).as_timestamp().is_none());
    }

    #[test]
    fn json_view_exposes_the_parsed_document() {
        let doc = SqlValue::Json(serde_json::json!({ "tags": ["a", "b"] }));
        let json = doc.as_json().expect("json variant exposes its document");
        assert_eq!(json["tags"][0], "a");
        assert!(SqlValue::Text("{}".into()).as_json().is_none());
    }
}
