use std::sync::Arc;

use serde::{Deserialize, Serialize};

use storefront_core::{CollectionId, Entity};

use crate::product::Product;

/// A merchandising collection (e.g. "Jaguars", "Day of the Dead").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Collection {
    pub fn new(id: CollectionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            image: None,
            featured: false,
        }
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}

impl Entity for Collection {
    type Id = CollectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Which products a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum CollectionFilter {
    #[default]
    All,
    Collection(CollectionId),
    Featured,
}

impl CollectionFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CollectionFilter::All => true,
            CollectionFilter::Collection(id) => product.belongs_to(*id),
            CollectionFilter::Featured => product.featured,
        }
    }
}

/// Products passing `filter`, in their original order.
pub fn filter_products(products: &[Arc<Product>], filter: CollectionFilter) -> Vec<Arc<Product>> {
    products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}
