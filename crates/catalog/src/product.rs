use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use storefront_core::{CollectionId, DomainError, DomainResult, Entity, Money, ProductId, VariantId};

use crate::option::ProductOption;
use crate::variant::{Stock, Variant};

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Catalog product, as fully resolved by the catalog backend.
///
/// Immutable for the lifetime of any resolver built over it; share it as
/// `Arc<Product>` between views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Rich text (HTML) description.
    #[serde(default)]
    pub description: String,
    /// URL key (`/products/{slug}`).
    pub slug: String,
    /// Base price in smallest currency unit.
    pub price: Money,
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Variant shown before the shopper picks anything.
    #[serde(default)]
    pub default_variant_id: Option<VariantId>,
    #[serde(default)]
    pub collections: Vec<CollectionId>,
    /// Stock of the product itself; only consulted when it has no variants.
    #[serde(default)]
    pub stock: Stock,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, slug: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            slug: slug.into(),
            price,
            compare_at_price: None,
            images: Vec::new(),
            featured: false,
            options: Vec::new(),
            variants: Vec::new(),
            default_variant_id: None,
            collections: Vec::new(),
            stock: Stock::default(),
        }
    }

    pub fn with_description(mut self, html: impl Into<String>) -> Self {
        self.description = html.into();
        self
    }

    pub fn with_compare_at(mut self, compare_at: Money) -> Self {
        self.compare_at_price = Some(compare_at);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_default_variant(mut self, variant_id: VariantId) -> Self {
        self.default_variant_id = Some(variant_id);
        self
    }

    pub fn in_collection(mut self, collection_id: CollectionId) -> Self {
        self.collections.push(collection_id);
        self
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = stock;
        self
    }

    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Whether the shopper has anything to choose.
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Designated default variant if it exists, else the first declared one.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.default_variant_id
            .and_then(|id| self.variant(id))
            .or_else(|| self.variants.first())
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Description with markup removed, for listing cards.
    pub fn plain_description(&self) -> String {
        HTML_TAG_RE.replace_all(&self.description, "").trim().to_string()
    }

    pub fn belongs_to(&self, collection_id: CollectionId) -> bool {
        self.collections.contains(&collection_id)
    }

    /// Check the record against the catalog invariants.
    ///
    /// A resolver tolerates invalid records (it simply finds fewer matches),
    /// but the catalog provider refuses to serve them.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }

        if self.slug.trim().is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }

        let mut names = HashSet::new();
        for option in &self.options {
            if !names.insert(option.name.as_str()) {
                return Err(DomainError::invariant(format!(
                    "duplicate option name `{}`",
                    option.name
                )));
            }
            if option.values.is_empty() {
                return Err(DomainError::invariant(format!(
                    "option `{}` declares no values",
                    option.name
                )));
            }
            let mut values = HashSet::new();
            if let Some(dup) = option.values.iter().find(|v| !values.insert(v.as_str())) {
                return Err(DomainError::invariant(format!(
                    "option `{}` declares `{dup}` twice",
                    option.name
                )));
            }
        }

        if self.options.is_empty() && !self.variants.is_empty() {
            return Err(DomainError::invariant(
                "variants require at least one declared option",
            ));
        }

        let mut ids = HashSet::new();
        let mut combinations: HashSet<&BTreeMap<String, String>> = HashSet::new();
        for variant in &self.variants {
            if !ids.insert(variant.id) {
                return Err(DomainError::conflict(format!("duplicate variant id {}", variant.id)));
            }
            self.validate_variant_options(variant)?;
            if !combinations.insert(&variant.options) {
                return Err(DomainError::invariant(format!(
                    "variant {} repeats an existing option combination",
                    variant.id
                )));
            }
        }

        if let Some(default_id) = self.default_variant_id {
            if self.variant(default_id).is_none() {
                return Err(DomainError::invariant(format!(
                    "default variant {default_id} is not declared"
                )));
            }
        }

        Ok(())
    }

    fn validate_variant_options(&self, variant: &Variant) -> DomainResult<()> {
        if variant.options.len() != self.options.len() {
            return Err(DomainError::invariant(format!(
                "variant {} assigns {} option values, product declares {} options",
                variant.id,
                variant.options.len(),
                self.options.len()
            )));
        }
        for (name, value) in &variant.options {
            let Some(option) = self.option(name) else {
                return Err(DomainError::invariant(format!(
                    "variant {} uses undeclared option `{name}`",
                    variant.id
                )));
            };
            if !option.declares(value) {
                return Err(DomainError::invariant(format!(
                    "variant {} uses undeclared value `{value}` for option `{name}`",
                    variant.id
                )));
            }
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_product() -> Product {
        Product::new(ProductId::new(), "Fox Alebrije", "fox-alebrije", Money::from_cents(4_000))
            .with_option(ProductOption::new("Size", ["Small", "Large"]))
            .with_variant(
                Variant::new(VariantId::new(), Money::from_cents(4_000)).with_option("Size", "Small"),
            )
            .with_variant(
                Variant::new(VariantId::new(), Money::from_cents(6_000)).with_option("Size", "Large"),
            )
    }

    #[test]
    fn valid_product_passes() {
        sized_product().validate().unwrap();
    }

    #[test]
    fn rejects_empty_title() {
        let mut product = sized_product();
        product.title = "   ".to_string();
        match product.validate().unwrap_err() {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_option_names() {
        let product = sized_product().with_option(ProductOption::new("Size", ["XL"]));
        assert!(matches!(
            product.validate(),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn rejects_option_without_values() {
        let product = Product::new(ProductId::new(), "Owl", "owl", Money::from_cents(1_000))
            .with_option(ProductOption::new("Color", Vec::<String>::new()));
        assert!(matches!(
            product.validate(),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn rejects_repeated_combination() {
        let product = sized_product().with_variant(
            Variant::new(VariantId::new(), Money::from_cents(4_500)).with_option("Size", "Small"),
        );
        let err = product.validate().unwrap_err();
        assert!(err.to_string().contains("repeats an existing option combination"));
    }

    #[test]
    fn rejects_variant_with_missing_or_unknown_values() {
        let incomplete = sized_product()
            .with_option(ProductOption::new("Color", ["Red"]));
        assert!(incomplete.validate().is_err());

        let unknown = Product::new(ProductId::new(), "Cat", "cat", Money::from_cents(1_000))
            .with_option(ProductOption::new("Size", ["Small"]))
            .with_variant(
                Variant::new(VariantId::new(), Money::from_cents(1_000)).with_option("Size", "Huge"),
            );
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn rejects_variants_without_options() {
        let product = Product::new(ProductId::new(), "Cat", "cat", Money::from_cents(1_000))
            .with_variant(Variant::new(VariantId::new(), Money::from_cents(1_000)));
        assert!(product.validate().is_err());
    }

    #[test]
    fn rejects_undeclared_default_variant() {
        let product = sized_product().with_default_variant(VariantId::new());
        assert!(product.validate().is_err());
    }

    #[test]
    fn default_variant_prefers_designated_one() {
        let product = sized_product();
        assert_eq!(product.default_variant().map(|v| v.id), Some(product.variants[0].id));

        let large = product.variants[1].id;
        let product = product.with_default_variant(large);
        assert_eq!(product.default_variant().map(|v| v.id), Some(large));
    }

    #[test]
    fn plain_description_strips_markup() {
        let product = sized_product()
            .with_description("<p>Hand-carved in <strong>San Martín Tilcajete</strong>.</p>\n");
        assert_eq!(product.plain_description(), "Hand-carved in San Martín Tilcajete.");
    }

    #[test]
    fn deserializes_minimal_record() {
        let json = format!(
            r#"{{"id":"{}","title":"Jaguar","slug":"jaguar","price":12000}}"#,
            ProductId::new()
        );
        let product: Product = serde_json::from_str(&json).unwrap();
        assert!(!product.has_options());
        assert!(product.variants.is_empty());
        assert!(product.stock.is_in_stock());
        assert_eq!(product.primary_image(), None);
        product.validate().unwrap();
    }
}
