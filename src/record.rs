//! Path addressing for nested records.
//!
//! Every comparator in the crate looks at records through [`flatten`], which
//! maps a nested JSON value onto `path -> leaf` entries such as
//! `board.members[1].role`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{self, ScoreError};

/// Deepest nesting accepted by [`flatten`] before the input is treated as
/// malformed. [`flatten_truncated`] keeps anything deeper as one opaque leaf.
pub const MAX_RECORD_DEPTH: usize = 64;

/// Leaf values keyed by canonical path, in path order.
pub type FlatRecord = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthExceeded {
    pub path: String,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        };
        write!(f, "nesting exceeds {MAX_RECORD_DEPTH} levels at {path}")
    }
}

/// Scalar view of a leaf, used for type dispatch during comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Other(&'a Value),
}

impl<'a> FieldValue<'a> {
    /// Absent leaves classify as [`FieldValue::Null`].
    pub fn classify(value: Option<&'a Value>) -> Self {
        let Some(value) = value else {
            return Self::Null;
        };
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Other(value), Self::Number),
            Value::String(text) => Self::Text(text),
            Value::Array(_) | Value::Object(_) => Self::Other(value),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Other(Value::Array(_)) => "array",
            Self::Other(Value::Object(_)) => "object",
            Self::Other(_) => "other",
        }
    }
}

/// Flattens `record` into one entry per reachable leaf.
///
/// Object fields extend the path with `.name`, array elements with `[index]`.
/// Scalar array elements, and arrays nested directly inside arrays, are stored
/// at the indexed path as-is. Empty objects and arrays produce no entries.
pub fn flatten(record: &Value) -> Result<FlatRecord, DepthExceeded> {
    let mut out = FlatRecord::new();
    walk(record, "", 0, Overflow::Reject, &mut out)?;
    Ok(out)
}

/// Like [`flatten`], but a subtree starting past [`MAX_RECORD_DEPTH`] is
/// stored whole at its path instead of failing.
pub fn flatten_truncated(record: &Value) -> FlatRecord {
    let mut out = FlatRecord::new();
    // Truncation never reports an overflow.
    let _ = walk(record, "", 0, Overflow::Truncate, &mut out);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overflow {
    Reject,
    Truncate,
}

fn walk(
    value: &Value,
    prefix: &str,
    depth: usize,
    overflow: Overflow,
    out: &mut FlatRecord,
) -> Result<(), DepthExceeded> {
    if depth > MAX_RECORD_DEPTH {
        return match overflow {
            Overflow::Reject => Err(DepthExceeded {
                path: prefix.to_string(),
            }),
            Overflow::Truncate => {
                out.insert(prefix.to_string(), value.clone());
                Ok(())
            }
        };
    }

    match value {
        Value::Object(fields) => {
            for (key, child) in fields {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                walk(child, &path, depth + 1, overflow, out)?;
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let path = format!("{prefix}[{index}]");
                if item.is_object() {
                    walk(item, &path, depth + 1, overflow, out)?;
                } else {
                    out.insert(path, item.clone());
                }
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }

    Ok(())
}

/// Flattens the ground-truth record. Anything that is not a finite-depth
/// object has nothing to score against.
pub(crate) fn flatten_reference(reference: &Value) -> error::Result<FlatRecord> {
    if !reference.is_object() {
        return Err(ScoreError::MalformedReference(format!(
            "expected an object at the top level, got {}",
            FieldValue::classify(Some(reference)).type_name()
        )));
    }
    flatten(reference).map_err(|err| ScoreError::MalformedReference(err.to_string()))
}

/// Flattens the extraction under test. A non-object candidate scores as an
/// empty record; the schema check reports the shape problem. Subtrees nested
/// past the depth limit cannot line up with any reference path and are kept
/// as opaque leaves.
pub(crate) fn flatten_candidate(candidate: &Value) -> FlatRecord {
    if !candidate.is_object() {
        return FlatRecord::new();
    }
    flatten_truncated(candidate)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Splits a canonical path back into its field and index segments.
///
/// Returns `None` for text that [`flatten`] could not have produced, such as an
/// unterminated or non-numeric index.
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Some(segments);
    }

    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(open) => part.split_at(open),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(PathSegment::Field(name.to_string()));
        }
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest.get(1..close)?.parse::<usize>().ok()?;
            segments.push(PathSegment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }

    Some(segments)
}

/// Looks up the value addressed by `path`, if present.
pub fn value_at<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    segments
        .iter()
        .try_fold(record, |current, segment| match segment {
            PathSegment::Field(name) => current.get(name.as_str()),
            PathSegment::Index(index) => current.get(*index),
        })
}
