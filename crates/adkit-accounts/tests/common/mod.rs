//! Fake directory session for engine tests.
//!
//! Models the behavior the engine relies on: multi-valued attribute storage
//! with duplicate rejection, forest-wide SPN uniqueness, failure on deleting
//! an absent value, and atomic add with DN collision detection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use adkit_directory::{
    AddRequest, AttributeValue, DirectoryError, DirectoryResult, DirectorySession, Entry, ModifyOp,
    SearchScope,
};

/// One stored entry. Kept as a list rather than a map keyed by DN so tests
/// can stage pathological duplicate-DN result sets.
#[derive(Debug, Clone)]
pub struct FakeEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<AttributeValue>>,
}

/// In-memory stand-in for a directory server.
pub struct FakeDirectory {
    entries: Mutex<Vec<FakeEntry>>,
    secure: bool,
    unbound: AtomicBool,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            secure: true,
            unbound: AtomicBool::new(false),
        }
    }

    /// A fake bound over plaintext; password operations must refuse it.
    pub fn insecure() -> Self {
        Self {
            secure: false,
            ..Self::new()
        }
    }

    /// Stage an entry with the given text attributes.
    pub fn with_entry(self, dn: &str, attrs: &[(&str, &[&str])]) -> Self {
        let attrs = attrs
            .iter()
            .map(|(name, values)| {
                (
                    (*name).to_string(),
                    values
                        .iter()
                        .map(|v| AttributeValue::Text((*v).to_string()))
                        .collect(),
                )
            })
            .collect();
        self.entries.lock().unwrap().push(FakeEntry {
            dn: dn.to_string(),
            attrs,
        });
        self
    }

    /// All values of an attribute on an entry, for assertions.
    pub fn attr_values(&self, dn: &str, attribute: &str) -> Vec<AttributeValue> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.dn == dn)
            .and_then(|e| e.attrs.get(attribute).cloned())
            .unwrap_or_default()
    }

    /// First text value of an attribute on an entry, for assertions.
    pub fn attr_text(&self, dn: &str, attribute: &str) -> Option<String> {
        self.attr_values(dn, attribute)
            .iter()
            .find_map(|v| v.as_text().map(str::to_string))
    }

    pub fn has_entry(&self, dn: &str) -> bool {
        self.entries.lock().unwrap().iter().any(|e| e.dn == dn)
    }

    pub fn is_unbound(&self) -> bool {
        self.unbound.load(Ordering::SeqCst)
    }

    /// True when any entry other than `dn` already carries this SPN. The
    /// real directory enforces this forest-wide.
    fn spn_taken_elsewhere(entries: &[FakeEntry], dn: &str, value: &AttributeValue) -> bool {
        entries.iter().any(|e| {
            e.dn != dn
                && e.attrs
                    .get("servicePrincipalName")
                    .is_some_and(|values| values.contains(value))
        })
    }

    /// Minimal filter evaluation: presence (`(objectClass=*)`) and a single
    /// equality test. Enough for the engine's fixed filters and the simple
    /// caller filters the tests use.
    fn matches_filter(entry: &FakeEntry, filter: &str) -> bool {
        let Some(inner) = filter
            .strip_prefix('(')
            .and_then(|f| f.strip_suffix(')'))
        else {
            return false;
        };
        let Some((attribute, value)) = inner.split_once('=') else {
            return false;
        };

        if value == "*" {
            return attribute == "objectClass" || entry.attrs.contains_key(attribute);
        }

        entry
            .attrs
            .get(attribute)
            .is_some_and(|values| values.iter().any(|v| v.as_text() == Some(value)))
    }

    fn project(entry: &FakeEntry, attrs: &[&str]) -> Entry {
        let mut result = Entry::new(entry.dn.clone());
        let all = attrs.contains(&"*");
        for (name, values) in &entry.attrs {
            if all || attrs.contains(&name.as_str()) {
                result.set(name.clone(), values.clone());
            }
        }
        result
    }
}

#[async_trait]
impl DirectorySession for FakeDirectory {
    async fn search(
        &self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attrs: &[&str],
    ) -> DirectoryResult<Vec<Entry>> {
        let entries = self.entries.lock().unwrap();

        let in_scope = |e: &FakeEntry| match scope {
            SearchScope::Base => e.dn == base_dn,
            SearchScope::OneLevel | SearchScope::Subtree => e.dn.ends_with(base_dn),
        };

        Ok(entries
            .iter()
            .filter(|e| in_scope(e) && Self::matches_filter(e, filter))
            .map(|e| Self::project(e, attrs))
            .collect())
    }

    async fn modify(&self, dn: &str, ops: Vec<ModifyOp>) -> DirectoryResult<()> {
        let mut entries = self.entries.lock().unwrap();

        // Uniqueness checks need the whole store, so find the index first.
        let index = entries
            .iter()
            .position(|e| e.dn == dn)
            .ok_or_else(|| DirectoryError::not_found(dn))?;

        for op in ops {
            match op {
                ModifyOp::Add { attribute, values } => {
                    for value in values {
                        let existing = entries[index].attrs.get(&attribute);
                        if existing.is_some_and(|vs| vs.contains(&value)) {
                            return Err(DirectoryError::ConstraintViolation {
                                diagnostic: format!("attribute or value exists: {attribute}"),
                            });
                        }
                        if attribute == "servicePrincipalName"
                            && Self::spn_taken_elsewhere(&entries, dn, &value)
                        {
                            return Err(DirectoryError::ConstraintViolation {
                                diagnostic: "SPN value already assigned elsewhere".to_string(),
                            });
                        }
                        entries[index]
                            .attrs
                            .entry(attribute.clone())
                            .or_default()
                            .push(value);
                    }
                }
                ModifyOp::Delete { attribute, values } => {
                    for value in values {
                        let stored = entries[index].attrs.get_mut(&attribute);
                        let position = stored
                            .as_ref()
                            .and_then(|vs| vs.iter().position(|v| *v == value));
                        match (stored, position) {
                            (Some(vs), Some(pos)) => {
                                vs.remove(pos);
                            }
                            _ => {
                                return Err(DirectoryError::operation_failed(
                                    16,
                                    format!("no such attribute: {attribute}"),
                                ));
                            }
                        }
                    }
                }
                ModifyOp::Replace { attribute, values } => {
                    entries[index].attrs.insert(attribute, values);
                }
            }
        }

        Ok(())
    }

    async fn add(&self, dn: &str, request: AddRequest) -> DirectoryResult<()> {
        let mut entries = self.entries.lock().unwrap();

        if entries.iter().any(|e| e.dn == dn) {
            return Err(DirectoryError::AlreadyExists { dn: dn.to_string() });
        }

        let attrs: HashMap<String, Vec<AttributeValue>> = request
            .iter()
            .map(|(name, values)| (name.to_string(), values.to_vec()))
            .collect();

        entries.push(FakeEntry {
            dn: dn.to_string(),
            attrs,
        });

        Ok(())
    }

    async fn unbind(&self) -> DirectoryResult<()> {
        self.unbound.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_secure(&self) -> bool {
        self.secure
    }
}
