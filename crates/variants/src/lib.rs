//! Product variant resolution.
//!
//! A [`VariantResolver`] turns one product's immutable catalog record plus the
//! shopper's partial option selection into everything a product card renders:
//! the matching variant, which option values are still reachable, the price
//! block, stock, and whether "add to cart" is enabled. It is the only writer
//! of cart line items from a product view.

pub mod combination;
pub mod config;
pub mod pricing;
pub mod resolver;
pub mod selection;
pub mod snapshot;

pub use combination::{CombinationIndex, CombinationKey};
pub use config::{ResolverConfig, UnavailableValuePolicy};
pub use pricing::{PriceQuote, discount_percentage};
pub use resolver::VariantResolver;
pub use selection::Selection;
pub use snapshot::{OptionValueView, OptionView, ResolverSnapshot};
