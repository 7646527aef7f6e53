//! Directory entry and attribute value model
//!
//! Attribute values are either text or raw bytes. The binary form exists for
//! attributes whose wire representation is not UTF-8: in practice the
//! credential attribute, which carries UTF-16LE content and must never round
//! through a lossy string conversion.

use std::collections::HashMap;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// A UTF-8 text value.
    Text(String),
    /// A raw byte sequence.
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// Get as text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Binary(_) => None,
        }
    }

    /// The wire-level bytes of this value.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttributeValue::Text(s) => s.as_bytes(),
            AttributeValue::Binary(b) => b,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(bytes: Vec<u8>) -> Self {
        AttributeValue::Binary(bytes)
    }
}

/// A directory entry: a DN plus its attributes.
///
/// Attribute values are sets in directory semantics; order is not
/// significant.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    /// Distinguished name of the entry.
    pub dn: String,
    /// Attribute name to values.
    pub attrs: HashMap<String, Vec<AttributeValue>>,
}

impl Entry {
    /// Create an empty entry with the given DN.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    /// Set an attribute to a list of values, replacing any previous values.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<AttributeValue>) {
        self.attrs.insert(name.into(), values);
    }

    /// Check whether the entry carries the attribute at all.
    pub fn has(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// First text value of an attribute, if present.
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)?
            .iter()
            .find_map(AttributeValue::as_text)
    }

    /// All text values of an attribute; empty when absent.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.attrs
            .get(name)
            .map(|values| values.iter().filter_map(AttributeValue::as_text).collect())
            .unwrap_or_default()
    }
}
