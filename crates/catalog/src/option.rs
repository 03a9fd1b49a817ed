use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named axis of variation (e.g. "Color", "Size") with its legal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    /// Declared values, in display order.
    pub values: Vec<String>,
    /// Value -> CSS colour. Only surfaced for a colour option.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub swatches: BTreeMap<String, String>,
}

impl ProductOption {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            swatches: BTreeMap::new(),
        }
    }

    pub fn with_swatch(mut self, value: impl Into<String>, color: impl Into<String>) -> Self {
        self.swatches.insert(value.into(), color.into());
        self
    }

    /// Whether this option is the colour axis (name matched case-insensitively).
    pub fn is_color(&self) -> bool {
        self.name.eq_ignore_ascii_case("color")
    }

    pub fn declares(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Swatch colour for `value`, if this is a colour option and one is declared.
    pub fn swatch_for(&self, value: &str) -> Option<&str> {
        if !self.is_color() {
            return None;
        }
        self.swatches.get(value).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatches_only_apply_to_color_options() {
        let color = ProductOption::new("color", ["Red", "Blue"]).with_swatch("Red", "#c0392b");
        assert_eq!(color.swatch_for("Red"), Some("#c0392b"));
        assert_eq!(color.swatch_for("Blue"), None);

        let size = ProductOption::new("Size", ["S"]).with_swatch("S", "#000000");
        assert_eq!(size.swatch_for("S"), None);
    }

    #[test]
    fn declares_matches_exact_values() {
        let size = ProductOption::new("Size", ["Small", "Large"]);
        assert!(size.declares("Small"));
        assert!(!size.declares("small"));
        assert!(!size.declares("Medium"));
    }
}
