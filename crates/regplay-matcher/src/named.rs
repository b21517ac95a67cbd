// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Named capture groups in the order the service lists them.
//!
//! The service emits groups in pattern-definition order and that order is
//! what users read, so the JSON object is kept as an ordered list of pairs
//! rather than a sorted or hashed map.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedGroups<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for NamedGroups<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> NamedGroups<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, keeping its original position when it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a NamedGroups<T> {
    type Item = (&'a str, &'a T);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a T)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<T: Serialize> Serialize for NamedGroups<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct NamedGroupsVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for NamedGroupsVisitor<T> {
    type Value = NamedGroups<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of named capture groups")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = NamedGroups::new();
        while let Some((name, value)) = access.next_entry::<String, T>()? {
            groups.insert(name, value);
        }
        Ok(groups)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedGroups<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamedGroupsVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_order_survives_a_round_trip() {
        let raw = r#"{"user":"info","domain":"example","tld":"com"}"#;
        let groups: NamedGroups<Option<String>> = serde_json::from_str(raw).unwrap();
        assert_eq!(groups.names().collect::<Vec<_>>(), ["user", "domain", "tld"]);
        assert_eq!(serde_json::to_string(&groups).unwrap(), raw);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut g = NamedGroups::new();
        g.insert("b", 1);
        g.insert("a", 2);
        g.insert("b", 3);
        assert_eq!(g.iter().collect::<Vec<_>>(), [("b", &3), ("a", &2)]);
        assert_eq!(g.get("a"), Some(&2));
        assert_eq!(g.get("z"), None);
        assert_eq!(g.len(), 2);
    }
}
