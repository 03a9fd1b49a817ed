//! Catalog provider seam.
//!
//! The storefront reads catalog records through [`CatalogProvider`]. The
//! hosted backend client lives outside this workspace; [`InMemoryCatalog`]
//! serves tests, demos and pre-fetched snapshots.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use storefront_core::{CollectionId, DomainError, DomainResult, Entity, ProductId};

use crate::collection::{Collection, CollectionFilter, filter_products};
use crate::product::Product;

/// Read access to fully resolved catalog records.
pub trait CatalogProvider: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Arc<Product>>;
    fn product_by_slug(&self, slug: &str) -> Option<Arc<Product>>;
    /// All products, in catalog order.
    fn products(&self) -> Vec<Arc<Product>>;
    fn collection(&self, id: CollectionId) -> Option<Collection>;
    fn collections(&self) -> Vec<Collection>;

    fn products_matching(&self, filter: CollectionFilter) -> Vec<Arc<Product>> {
        filter_products(&self.products(), filter)
    }
}

impl<P> CatalogProvider for Arc<P>
where
    P: CatalogProvider + ?Sized,
{
    fn product(&self, id: ProductId) -> Option<Arc<Product>> {
        (**self).product(id)
    }

    fn product_by_slug(&self, slug: &str) -> Option<Arc<Product>> {
        (**self).product_by_slug(slug)
    }

    fn products(&self) -> Vec<Arc<Product>> {
        (**self).products()
    }

    fn collection(&self, id: CollectionId) -> Option<Collection> {
        (**self).collection(id)
    }

    fn collections(&self) -> Vec<Collection> {
        (**self).collections()
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Arc<Product>>,
    by_id: HashMap<ProductId, usize>,
    collections: Vec<Collection>,
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product after checking it against the catalog invariants.
    pub fn insert_product(&self, product: Product) -> DomainResult<Arc<Product>> {
        product.validate()?;

        let mut state = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;

        let id = *Entity::id(&product);
        if state.by_id.contains_key(&id) {
            return Err(DomainError::conflict(format!("product {id} already exists")));
        }
        if state.products.iter().any(|p| p.slug == product.slug) {
            return Err(DomainError::conflict(format!(
                "slug `{}` already in use",
                product.slug
            )));
        }

        let product = Arc::new(product);
        let position = state.products.len();
        state.products.push(Arc::clone(&product));
        state.by_id.insert(id, position);
        tracing::debug!(product_id = %id, slug = %product.slug, "catalog product registered");
        Ok(product)
    }

    pub fn insert_collection(&self, collection: Collection) -> DomainResult<()> {
        if collection.name.trim().is_empty() {
            return Err(DomainError::validation("collection name cannot be empty"));
        }

        let mut state = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;

        if state.collections.iter().any(|c| c.id == collection.id) {
            return Err(DomainError::conflict(format!(
                "collection {} already exists",
                collection.id
            )));
        }
        state.collections.push(collection);
        Ok(())
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Arc<Product>> {
        let state = self.inner.read().ok()?;
        let position = *state.by_id.get(&id)?;
        state.products.get(position).cloned()
    }

    fn product_by_slug(&self, slug: &str) -> Option<Arc<Product>> {
        let state = self.inner.read().ok()?;
        state.products.iter().find(|p| p.slug == slug).cloned()
    }

    fn products(&self) -> Vec<Arc<Product>> {
        match self.inner.read() {
            Ok(state) => state.products.clone(),
            Err(_) => vec![],
        }
    }

    fn collection(&self, id: CollectionId) -> Option<Collection> {
        let state = self.inner.read().ok()?;
        state.collections.iter().find(|c| c.id == id).cloned()
    }

    fn collections(&self) -> Vec<Collection> {
        match self.inner.read() {
            Ok(state) => state.collections.clone(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::ProductOption;
    use storefront_core::Money;

    fn product(slug: &str) -> Product {
        Product::new(ProductId::new(), slug, slug, Money::from_cents(2_500))
    }

    #[test]
    fn serves_registered_products_by_id_and_slug() {
        let catalog = InMemoryCatalog::new();
        let fox = catalog.insert_product(product("fox")).unwrap();
        catalog.insert_product(product("owl")).unwrap();

        assert_eq!(catalog.product(fox.id).map(|p| p.slug.clone()), Some("fox".to_string()));
        assert_eq!(catalog.product_by_slug("owl").map(|p| p.title.clone()), Some("owl".to_string()));
        assert!(catalog.product(ProductId::new()).is_none());
        assert!(catalog.product_by_slug("armadillo").is_none());

        let slugs: Vec<_> = catalog.products().iter().map(|p| p.slug.clone()).collect();
        assert_eq!(slugs, vec!["fox", "owl"]);
    }

    #[test]
    fn refuses_invalid_products() {
        let catalog = InMemoryCatalog::new();
        let broken = product("bat").with_option(ProductOption::new("Color", Vec::<String>::new()));
        assert!(catalog.insert_product(broken).is_err());
        assert!(catalog.products().is_empty());
    }

    #[test]
    fn refuses_duplicate_ids_and_slugs() {
        let catalog = InMemoryCatalog::new();
        let fox = product("fox");
        let mut same_id = product("other-fox");
        same_id.id = fox.id;
        catalog.insert_product(fox).unwrap();

        assert!(matches!(
            catalog.insert_product(same_id),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            catalog.insert_product(product("fox")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn lists_products_of_a_collection() {
        let catalog = InMemoryCatalog::new();
        let jaguars = Collection::new(CollectionId::new(), "Jaguars").featured();
        let jaguar_id = jaguars.id;
        catalog.insert_collection(jaguars).unwrap();
        catalog.insert_product(product("jaguar").in_collection(jaguar_id)).unwrap();
        catalog.insert_product(product("owl")).unwrap();

        let shown = catalog.products_matching(CollectionFilter::Collection(jaguar_id));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].slug, "jaguar");
        assert_eq!(catalog.collection(jaguar_id).map(|c| c.featured), Some(true));
        assert_eq!(catalog.collections().len(), 1);
    }
}
