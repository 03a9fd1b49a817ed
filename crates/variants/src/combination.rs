//! Combination index: exact-match and reachability lookups over a product's
//! variants, built once per resolver.

use std::collections::HashMap;
use std::fmt;

use storefront_catalog::Product;
use storefront_core::ValueObject;

/// Canonical form of an option/value combination: pairs sorted by option name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationKey(Vec<(String, String)>);

impl CombinationKey {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        pairs.sort();
        pairs.dedup_by(|later, earlier| later.0 == earlier.0);
        Self(pairs)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl ValueObject for CombinationKey {}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (option, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{option}={value}")?;
        }
        Ok(())
    }
}

/// Lookup tables over `product.variants`, addressed by declaration position.
#[derive(Debug, Clone, Default)]
pub struct CombinationIndex {
    by_key: HashMap<CombinationKey, usize>,
    /// option -> value -> ascending variant positions carrying that value.
    postings: HashMap<String, HashMap<String, Vec<usize>>>,
    variant_count: usize,
}

impl CombinationIndex {
    pub fn build(product: &Product) -> Self {
        let mut index = Self {
            variant_count: product.variants.len(),
            ..Self::default()
        };

        for (position, variant) in product.variants.iter().enumerate() {
            let key = CombinationKey::from_pairs(
                variant.options.iter().map(|(o, v)| (o.as_str(), v.as_str())),
            );
            // First declaration wins if a catalog record repeats a combination.
            index.by_key.entry(key).or_insert(position);

            for (option, value) in &variant.options {
                index
                    .postings
                    .entry(option.clone())
                    .or_default()
                    .entry(value.clone())
                    .or_default()
                    .push(position);
            }
        }

        index
    }

    /// Position of the variant with exactly this combination.
    pub fn exact(&self, key: &CombinationKey) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Positions of variants carrying `value` for `option`.
    pub fn postings(&self, option: &str, value: &str) -> &[usize] {
        self.postings
            .get(option)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions (ascending) of variants satisfying every constraint.
    pub fn consistent(&self, constraints: &[(&str, &str)]) -> Vec<usize> {
        if constraints.is_empty() {
            return (0..self.variant_count).collect();
        }

        let lists: Vec<&[usize]> = constraints
            .iter()
            .map(|(option, value)| self.postings(option, value))
            .collect();

        let Some(shortest) = lists.iter().min_by_key(|list| list.len()) else {
            return Vec::new();
        };

        shortest
            .iter()
            .copied()
            .filter(|position| lists.iter().all(|list| list.binary_search(position).is_ok()))
            .collect()
    }

    /// Whether any variant satisfies every constraint.
    pub fn any_consistent(&self, constraints: &[(&str, &str)]) -> bool {
        if constraints.is_empty() {
            return self.variant_count > 0;
        }

        let lists: Vec<&[usize]> = constraints
            .iter()
            .map(|(option, value)| self.postings(option, value))
            .collect();

        lists
            .iter()
            .min_by_key(|list| list.len())
            .is_some_and(|shortest| {
                shortest
                    .iter()
                    .any(|position| lists.iter().all(|list| list.binary_search(position).is_ok()))
            })
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }
}
