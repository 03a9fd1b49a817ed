//! Storefront catalog domain module.
//!
//! Immutable product, variant and collection records as the catalog backend
//! delivers them, the invariants a record must satisfy before a resolver is
//! built over it, and the provider seam the storefront reads through.

pub mod collection;
pub mod option;
pub mod product;
pub mod provider;
pub mod variant;

pub use collection::{Collection, CollectionFilter, filter_products};
pub use option::ProductOption;
pub use product::Product;
pub use provider::{CatalogProvider, InMemoryCatalog};
pub use variant::{Stock, Variant};
