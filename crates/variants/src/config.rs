//! Resolver configuration.
//!
//! Defaults suit a storefront card; deployments override them through
//! environment variables.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the snapshot exposes option values no variant can reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnavailableValuePolicy {
    /// List them with `available = false` (rendered dimmed).
    #[default]
    ShowDisabled,
    /// Leave them out of the option list.
    Hide,
}

impl FromStr for UnavailableValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" | "disabled" | "show-disabled" => Ok(Self::ShowDisabled),
            "hide" | "hidden" => Ok(Self::Hide),
            other => Err(format!("unknown unavailable-value policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub unavailable_values: UnavailableValuePolicy,
    /// Quantity sent by a plain "add to cart".
    pub default_quantity: u32,
    /// Start from the default variant's combination instead of an empty selection.
    pub seed_default_selection: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            unavailable_values: UnavailableValuePolicy::ShowDisabled,
            default_quantity: 1,
            seed_default_selection: false,
        }
    }
}

impl ResolverConfig {
    pub const ENV_UNAVAILABLE_VALUES: &'static str = "STOREFRONT_UNAVAILABLE_VALUES";
    pub const ENV_DEFAULT_QUANTITY: &'static str = "STOREFRONT_DEFAULT_QUANTITY";
    pub const ENV_SEED_SELECTION: &'static str = "STOREFRONT_SEED_SELECTION";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::ENV_UNAVAILABLE_VALUES) {
            match raw.parse() {
                Ok(policy) => config.unavailable_values = policy,
                Err(e) => tracing::warn!(key = Self::ENV_UNAVAILABLE_VALUES, "{e}; using default"),
            }
        }

        if let Some(raw) = lookup(Self::ENV_DEFAULT_QUANTITY) {
            match raw.trim().parse::<u32>() {
                Ok(qty) if qty > 0 => config.default_quantity = qty,
                _ => tracing::warn!(
                    key = Self::ENV_DEFAULT_QUANTITY,
                    value = %raw,
                    "expected a positive integer; using default"
                ),
            }
        }

        if let Some(raw) = lookup(Self::ENV_SEED_SELECTION) {
            match parse_flag(&raw) {
                Some(flag) => config.seed_default_selection = flag,
                None => tracing::warn!(
                    key = Self::ENV_SEED_SELECTION,
                    value = %raw,
                    "expected a boolean; using default"
                ),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(ResolverConfig::from_lookup(|_| None), ResolverConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = ResolverConfig::from_lookup(lookup(&[
            ("STOREFRONT_UNAVAILABLE_VALUES", "Hide"),
            ("STOREFRONT_DEFAULT_QUANTITY", " 3 "),
            ("STOREFRONT_SEED_SELECTION", "yes"),
        ]));
        assert_eq!(config.unavailable_values, UnavailableValuePolicy::Hide);
        assert_eq!(config.default_quantity, 3);
        assert!(config.seed_default_selection);
    }

    #[test]
    fn garbage_keeps_defaults() {
        let config = ResolverConfig::from_lookup(lookup(&[
            ("STOREFRONT_UNAVAILABLE_VALUES", "sometimes"),
            ("STOREFRONT_DEFAULT_QUANTITY", "0"),
            ("STOREFRONT_SEED_SELECTION", "maybe"),
        ]));
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"unavailable_values":"hide"}"#).unwrap();
        assert_eq!(config.unavailable_values, UnavailableValuePolicy::Hide);
        assert_eq!(config.default_quantity, 1);
    }
}
