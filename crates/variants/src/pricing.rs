//! Displayed price, compare-at price and discount derivation.

use serde::{Deserialize, Serialize};

use storefront_catalog::{Product, Variant};
use storefront_core::{Money, ValueObject};

/// What the price block shows for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub current_price: Money,
    /// Present only for a genuine markdown (strictly above `current_price`).
    pub compare_at: Option<Money>,
    pub discount_percentage: Option<u8>,
}

impl PriceQuote {
    /// Quote for `matched`, falling back to the product's own prices.
    pub fn derive(product: &Product, matched: Option<&Variant>) -> Self {
        let current_price = matched.map_or(product.price, |v| v.price);

        let compare_at = matched
            .and_then(|v| markdown(v.compare_at_price, current_price))
            .or_else(|| markdown(product.compare_at_price, current_price));

        let discount_percentage =
            compare_at.and_then(|compare_at| discount_percentage(current_price, compare_at));

        Self {
            current_price,
            compare_at,
            discount_percentage,
        }
    }
}

impl ValueObject for PriceQuote {}

fn markdown(candidate: Option<Money>, price: Money) -> Option<Money> {
    candidate.filter(|compare_at| *compare_at > price)
}

/// `round(100 * (compare_at - price) / compare_at)`, rounding half up.
///
/// `None` unless `compare_at > price`; the result is within `0..=100`.
pub fn discount_percentage(price: Money, compare_at: Money) -> Option<u8> {
    if compare_at <= price {
        return None;
    }
    let compare_at = u128::from(compare_at.cents());
    let off = compare_at - u128::from(price.cents());
    let percent = (200 * off + compare_at) / (2 * compare_at);
    u8::try_from(percent).ok()
}
