use std::collections::HashMap;

use serde::Deserialize;

use crate::event::PipelineEvent;

/// String key/value store with a total lookup.
///
/// `get` never fails: an absent key reads as `""`. Callers cannot tell
/// "absent" from "present but empty" through `get`; use `contains` when
/// that matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct KeyValues {
    entries: HashMap<String, String>,
}

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Context shared by every event of a batch: where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupInfo {
    #[serde(default)]
    pub metadata: KeyValues,
    #[serde(default)]
    pub tags: KeyValues,
}

impl GroupInfo {
    pub fn new(metadata: KeyValues, tags: KeyValues) -> Self {
        Self { metadata, tags }
    }
}

/// Ordered batch of events sharing one [`GroupInfo`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineGroupEvents {
    pub group: GroupInfo,
    pub events: Vec<PipelineEvent>,
}

impl PipelineGroupEvents {
    pub fn new(group: GroupInfo, events: Vec<PipelineEvent>) -> Self {
        Self { group, events }
    }
}
