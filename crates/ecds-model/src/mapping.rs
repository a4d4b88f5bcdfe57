//! Code-to-category value maps and the policies applied to unmapped codes.
//!
//! A [`ValueMap`] holds the static lookup for one ECDS field (for example
//! `gender` codes `1`/`2` to `Male`/`Female`). Codes are compared in their
//! string form; callers are responsible for rendering numeric cells first.
//!
//! What happens to a code that is *not* in the map is decided by the stage's
//! [`UnmappedPolicy`], never implicitly by the lookup itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Static mapping from raw code to category label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMap {
    entries: BTreeMap<String, String>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a code, rejecting duplicates.
    pub fn try_insert(&mut self, code: impl Into<String>, label: impl Into<String>) -> Result<()> {
        let code = code.into();
        if self.entries.contains_key(&code) {
            return Err(ModelError::DuplicateCode { code });
        }
        self.entries.insert(code, label.into());
        Ok(())
    }

    /// Label for a code, if the code is known.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels this map can produce.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Resolve a raw code under the given policy.
    ///
    /// `None` represents a null cell.
    pub fn resolve(&self, raw: Option<&str>, policy: &UnmappedPolicy) -> Resolution {
        let outcome = match raw {
            Some(code) if self.contains(code) => LookupOutcome::Mapped,
            Some(_) => LookupOutcome::Unmapped,
            None => LookupOutcome::Missing,
        };

        let value = match (policy, outcome) {
            (_, LookupOutcome::Mapped) => raw.and_then(|code| self.get(code)).map(String::from),
            (UnmappedPolicy::PassThrough, _) => raw.map(String::from),
            (UnmappedPolicy::Null, _) => None,
            // The default label goes through the map too, so a default that is
            // itself a known code resolves to its label.
            (UnmappedPolicy::Default(default), _) => Some(
                self.get(default)
                    .map_or_else(|| default.clone(), String::from),
            ),
        };

        Resolution { value, outcome }
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<String>,
{
    /// Later pairs replace earlier ones with the same code.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(code, label)| (code.into(), label.into()))
                .collect(),
        }
    }
}

/// Treatment of codes that are absent from a stage's value map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Keep the raw code unchanged.
    PassThrough,
    /// Replace with a fixed label (also applied to null cells).
    Default(String),
    /// Replace with null.
    Null,
}

impl UnmappedPolicy {
    pub fn default_label(label: impl Into<String>) -> Self {
        Self::Default(label.into())
    }
}

impl fmt::Display for UnmappedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough => f.write_str("pass-through"),
            Self::Default(label) => write!(f, "default \"{label}\""),
            Self::Null => f.write_str("null"),
        }
    }
}

/// How a single raw value was matched against a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The code was found in the table.
    Mapped,
    /// The code was present but not in the table.
    Unmapped,
    /// The cell was null.
    Missing,
}

/// Result of resolving one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: Option<String>,
    pub outcome: LookupOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender() -> ValueMap {
        [("1", "Male"), ("2", "Female")].into_iter().collect()
    }

    #[test]
    fn pass_through_keeps_unknown_codes() {
        let map = gender();
        let policy = UnmappedPolicy::PassThrough;
        assert_eq!(map.resolve(Some("1"), &policy).value.as_deref(), Some("Male"));
        let unknown = map.resolve(Some("9"), &policy);
        assert_eq!(unknown.value.as_deref(), Some("9"));
        assert_eq!(unknown.outcome, LookupOutcome::Unmapped);
        assert_eq!(map.resolve(None, &policy).value, None);
    }

    #[test]
    fn default_policy_applies_to_nulls() {
        let map: ValueMap = [("B", "Bloods")].into_iter().collect();
        let policy = UnmappedPolicy::default_label("Urgent");
        assert_eq!(map.resolve(Some("X"), &policy).value.as_deref(), Some("Urgent"));
        let missing = map.resolve(None, &policy);
        assert_eq!(missing.value.as_deref(), Some("Urgent"));
        assert_eq!(missing.outcome, LookupOutcome::Missing);
    }

    #[test]
    fn default_label_is_remapped_when_known() {
        let map: ValueMap = [("Other", "Other service")].into_iter().collect();
        let policy = UnmappedPolicy::default_label("Other");
        assert_eq!(
            map.resolve(Some("ZZ"), &policy).value.as_deref(),
            Some("Other service")
        );
    }

    #[test]
    fn try_insert_rejects_duplicates() {
        let mut map = ValueMap::new();
        map.try_insert("1", "Male").unwrap();
        let err = map.try_insert("1", "Female").unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateCode {
                code: "1".to_string()
            }
        );
    }

    #[test]
    fn policy_display() {
        assert_eq!(UnmappedPolicy::PassThrough.to_string(), "pass-through");
        assert_eq!(
            UnmappedPolicy::default_label("Urgent").to_string(),
            "default \"Urgent\""
        );
        assert_eq!(UnmappedPolicy::Null.to_string(), "null");
    }
}
