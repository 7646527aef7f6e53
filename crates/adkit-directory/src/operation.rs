//! Directory mutation operation types
//!
//! The three-way LDAP modify vocabulary plus the add-request shape used for
//! entry creation. Operations are constructed per call, handed to the
//! session, and discarded.

use ldap3::Scope;

use crate::entry::AttributeValue;

/// Search scope for a directory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// The base entry only.
    Base,
    /// Immediate children of the base entry.
    OneLevel,
    /// The base entry and its whole subtree.
    Subtree,
}

impl From<SearchScope> for Scope {
    fn from(scope: SearchScope) -> Self {
        match scope {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }
}

/// A single attribute modification within a modify request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOp {
    /// Add values to a (possibly multi-valued) attribute without touching
    /// other values. The directory rejects duplicates.
    Add {
        attribute: String,
        values: Vec<AttributeValue>,
    },
    /// Delete specific values from an attribute. Fails if a value is not
    /// currently present.
    Delete {
        attribute: String,
        values: Vec<AttributeValue>,
    },
    /// Replace all values of an attribute.
    Replace {
        attribute: String,
        values: Vec<AttributeValue>,
    },
}

impl ModifyOp {
    /// Add a single value to an attribute.
    pub fn add(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        ModifyOp::Add {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Delete a single value from an attribute.
    pub fn delete(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        ModifyOp::Delete {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Replace an attribute with a single value.
    pub fn replace(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        ModifyOp::Replace {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// The attribute this operation targets.
    pub fn attribute(&self) -> &str {
        match self {
            ModifyOp::Add { attribute, .. }
            | ModifyOp::Delete { attribute, .. }
            | ModifyOp::Replace { attribute, .. } => attribute,
        }
    }
}

/// Attributes for a new entry, including its `objectClass` list.
///
/// Kept as an ordered list of (attribute, values) pairs; the builder
/// deduplicates values within an attribute, since the directory treats
/// duplicate values in one add as an error.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    attributes: Vec<(String, Vec<AttributeValue>)>,
}

impl AddRequest {
    /// Create an empty add request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute with multiple values, deduplicating them.
    pub fn with_values(mut self, name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        let mut deduped: Vec<AttributeValue> = Vec::with_capacity(values.len());
        for value in values {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        self.attributes.push((name.into(), deduped));
        self
    }

    /// Set a single-valued attribute.
    pub fn with(self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_values(name, vec![value.into()])
    }

    /// Iterate over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttributeValue])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Look up an attribute's values by name.
    pub fn get(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_op_attribute() {
        let op = ModifyOp::add("servicePrincipalName", "HTTP/web.example.com");
        assert_eq!(op.attribute(), "servicePrincipalName");

        let op = ModifyOp::replace("userAccountControl", "512");
        assert_eq!(op.attribute(), "userAccountControl");
    }

    #[test]
    fn test_add_request_deduplicates_values() {
        let req = AddRequest::new().with_values(
            "objectClass",
            vec![
                AttributeValue::from("top"),
                AttributeValue::from("person"),
                AttributeValue::from("top"),
            ],
        );

        assert_eq!(req.get("objectClass").unwrap().len(), 2);
    }

    #[test]
    fn test_add_request_preserves_order() {
        let req = AddRequest::new()
            .with("cn", "Bob")
            .with("sAMAccountName", "bob");

        let names: Vec<&str> = req.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["cn", "sAMAccountName"]);
    }
}
