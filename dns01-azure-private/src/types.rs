use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============ Challenge ============

/// The record name and value a DNS-01 challenge must be published at.
///
/// Built fresh for every `present`/`cleanup` call by
/// [`ChallengeInfo::new`](crate::dns01::ChallengeInfo::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInfo {
    /// Fully-qualified name (with trailing dot) that carries the TXT record,
    /// e.g. `_acme-challenge.example.com.`.
    pub effective_fqdn: String,
    /// TXT value: base64url (no padding) of the SHA-256 of the key authorization.
    pub value: String,
}

// ============ TXT Record Set ============

/// Distinct TXT values stored under one name.
///
/// Backed by an ordered set, so duplicates collapse on insert and iteration
/// order is stable (lexicographic) regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxtValues(BTreeSet<String>);

impl TxtValues {
    /// Creates an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning `false` if it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        self.0.insert(value.into())
    }

    /// Removes a value, returning `true` if it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        self.0.remove(value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates values in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TxtValues {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for TxtValues {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for TxtValues {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A TXT record set at one relative name inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxtRecordSet {
    /// Name relative to the zone (e.g. `_acme-challenge.sub`).
    pub name: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Distinct TXT values.
    pub values: TxtValues,
}

// ============ Policies ============

/// Propagation-check cadence suggested to the caller.
///
/// Constant for the provider's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutPolicy {
    /// Upper bound on how long the caller should wait for propagation.
    pub timeout: Duration,
    /// Interval between the caller's propagation checks.
    pub interval: Duration,
}

/// What `cleanup` does to the TXT record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupStrategy {
    /// Delete the whole record set, including values other attempts may have added.
    #[default]
    DeleteRecordSet,
    /// Remove only this challenge's value; delete the set once it is empty.
    RetractValue,
}

impl std::str::FromStr for CleanupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete-record-set" | "delete" => Ok(Self::DeleteRecordSet),
            "retract-value" | "retract" => Ok(Self::RetractValue),
            other => Err(format!(
                "unknown cleanup strategy '{other}', expected 'delete-record-set' or 'retract-value'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_values_deduplicate() {
        let mut values = TxtValues::new();
        assert!(values.insert("a"));
        assert!(values.insert("b"));
        assert!(!values.insert("a"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn txt_values_order_insensitive() {
        let left: TxtValues = ["c", "a", "b"].into_iter().collect();
        let right: TxtValues = ["b", "c", "a", "a"].into_iter().collect();
        assert_eq!(left, right);
        assert_eq!(left.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn txt_values_remove() {
        let mut values: TxtValues = ["a", "b"].into_iter().collect();
        assert!(values.remove("a"));
        assert!(!values.remove("a"));
        assert!(!values.contains("a"));
        assert!(values.contains("b"));
    }

    #[test]
    fn txt_values_serialize_as_array() {
        let values: TxtValues = ["b", "a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn cleanup_strategy_parse() {
        assert_eq!(
            "delete-record-set".parse::<CleanupStrategy>(),
            Ok(CleanupStrategy::DeleteRecordSet)
        );
        assert_eq!(
            " Retract-Value ".parse::<CleanupStrategy>(),
            Ok(CleanupStrategy::RetractValue)
        );
        assert!("purge".parse::<CleanupStrategy>().is_err());
    }

    #[test]
    fn cleanup_strategy_default_deletes_set() {
        assert_eq!(CleanupStrategy::default(), CleanupStrategy::DeleteRecordSet);
    }
}
