use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combination::CombinationKey;

/// The shopper's in-progress choice: option name -> value, possibly partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, option: &str) -> Option<&str> {
        self.0.get(option).map(String::as_str)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.contains_key(option)
    }

    /// Set `option` to `value`, returning the value it replaced.
    pub fn set(&mut self, option: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(option.into(), value.into())
    }

    pub fn remove(&mut self, option: &str) -> Option<String> {
        self.0.remove(option)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(o, v)| (o.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn key(&self) -> CombinationKey {
        CombinationKey::from_pairs(self.iter())
    }
}

impl<K, V> FromIterator<(K, V)> for Selection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for Selection {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_and_reports_previous() {
        let mut selection = Selection::new();
        assert_eq!(selection.set("Size", "Small"), None);
        assert_eq!(selection.set("Size", "Large"), Some("Small".to_string()));
        assert_eq!(selection.get("Size"), Some("Large"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn key_matches_pairs_in_any_order() {
        let selection: Selection = [("Size", "S"), ("Color", "Red")].into_iter().collect();
        assert_eq!(
            selection.key(),
            CombinationKey::from_pairs([("Color", "Red"), ("Size", "S")])
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let selection: Selection = [("Color", "Red")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&selection).unwrap(),
            r#"{"Color":"Red"}"#
        );
    }
}
