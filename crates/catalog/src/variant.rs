use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storefront_core::{Entity, Money, ValueObject, VariantId};

/// Stock as the catalog backend reports it: a tracked quantity or a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stock {
    Quantity(i64),
    Available(bool),
}

impl Stock {
    pub fn is_in_stock(self) -> bool {
        match self {
            Stock::Quantity(qty) => qty > 0,
            Stock::Available(flag) => flag,
        }
    }
}

impl Default for Stock {
    fn default() -> Self {
        Stock::Available(true)
    }
}

impl ValueObject for Stock {}

/// One concrete, purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// Option name -> chosen value; one entry per option the product declares.
    pub options: BTreeMap<String, String>,
    pub price: Money,
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    /// Overrides the product image while this variant is selected.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Stock,
}

impl Variant {
    pub fn new(id: VariantId, price: Money) -> Self {
        Self {
            id,
            options: BTreeMap::new(),
            price,
            compare_at_price: None,
            image: None,
            stock: Stock::default(),
        }
    }

    pub fn with_option(mut self, option: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(option.into(), value.into());
        self
    }

    pub fn with_compare_at(mut self, compare_at: Money) -> Self {
        self.compare_at_price = Some(compare_at);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = stock;
        self
    }

    pub fn value_for(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock.is_in_stock()
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
