use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storefront_core::{Money, ProductId, VariantId};

/// One value of one option, as a control renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValueView {
    pub value: String,
    /// Colour sample; rendered as a swatch instead of text when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch: Option<String>,
    pub selected: bool,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// Read-only view of a resolver, everything a product card needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSnapshot {
    pub product_id: ProductId,
    pub selected: BTreeMap<String, String>,
    pub matching_variant_id: Option<VariantId>,
    pub options: Vec<OptionView>,
    pub current_price: Money,
    pub current_compare_at: Option<Money>,
    pub discount_percentage: Option<u8>,
    pub in_stock: bool,
    pub has_variants: bool,
    pub can_add_to_cart: bool,
    pub image: Option<String>,
    pub featured: bool,
}

impl ResolverSnapshot {
    /// Availability of `value` for `option` as captured in this snapshot.
    ///
    /// Values hidden by the policy, and unknown pairs, report `false`.
    pub fn is_available(&self, option: &str, value: &str) -> bool {
        self.value(option, value).is_some_and(|v| v.available)
    }

    pub fn value(&self, option: &str, value: &str) -> Option<&OptionValueView> {
        self.options
            .iter()
            .find(|o| o.name == option)?
            .values
            .iter()
            .find(|v| v.value == value)
    }
}
