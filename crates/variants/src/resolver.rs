use std::sync::Arc;

use storefront_cart::{CartError, CartLine, CartStore, LineItemRequest};
use storefront_catalog::{Product, Variant};
use storefront_core::{DomainError, DomainResult, Money};

use crate::combination::CombinationIndex;
use crate::config::{ResolverConfig, UnavailableValuePolicy};
use crate::pricing::PriceQuote;
use crate::selection::Selection;
use crate::snapshot::{OptionValueView, OptionView, ResolverSnapshot};

/// Selection state and derived view for one rendered product card/detail view.
///
/// One instance per view: two cards for the same product each own a resolver
/// (and a selection) over the same shared `Arc<Product>`. Every derivation is
/// a pure function of the product and the current selection.
#[derive(Debug, Clone)]
pub struct VariantResolver {
    product: Arc<Product>,
    index: CombinationIndex,
    selection: Selection,
    config: ResolverConfig,
}

impl VariantResolver {
    pub fn new(product: Arc<Product>) -> Self {
        Self::with_config(product, ResolverConfig::default())
    }

    pub fn with_config(product: Arc<Product>, config: ResolverConfig) -> Self {
        let index = CombinationIndex::build(&product);
        let mut resolver = Self {
            product,
            index,
            selection: Selection::new(),
            config,
        };
        if resolver.config.seed_default_selection {
            resolver.seed_from_default_variant();
        }
        resolver
    }

    fn seed_from_default_variant(&mut self) {
        if !self.product.has_options() {
            return;
        }
        let Some(default) = self.product.default_variant() else {
            return;
        };
        self.selection = default
            .options
            .iter()
            .filter(|(option, value)| {
                self.product
                    .option(option)
                    .is_some_and(|declared| declared.declares(value))
            })
            .collect();
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Choose `value` for `option`, keeping every other option's choice.
    ///
    /// Only the pair itself is validated; an unreachable combination is
    /// representable. An undeclared pair leaves the selection untouched and
    /// returns [`DomainError::InvalidSelection`].
    pub fn select_option_value(&mut self, option: &str, value: &str) -> DomainResult<()> {
        let declared = self
            .product
            .option(option)
            .is_some_and(|o| o.declares(value));
        if !declared {
            tracing::warn!(
                product_id = %self.product.id,
                option,
                value,
                "ignoring selection of undeclared option value"
            );
            return Err(DomainError::invalid_selection(option, value));
        }

        let previous = self.selection.set(option, value);
        if previous.as_deref() != Some(value) {
            tracing::debug!(
                product_id = %self.product.id,
                option,
                value,
                previous = previous.as_deref(),
                "option value selected"
            );
        }
        Ok(())
    }

    /// Drop the choice for `option`, if any.
    pub fn clear_option(&mut self, option: &str) {
        self.selection.remove(option);
    }

    /// Back to an empty selection.
    pub fn reset(&mut self) {
        self.selection.clear();
    }

    /// The variant `selection` resolves to.
    ///
    /// - An empty selection resolves to the product's default variant: the
    ///   designated one if present, else the first declared.
    /// - A complete selection resolves through the combination index to the
    ///   variant with exactly that combination, or to nothing.
    /// - A partial selection resolves only when exactly one variant fits it.
    /// - Products without options have no variant to resolve.
    pub fn compute_matching_variant(&self, selection: &Selection) -> Option<&Variant> {
        if !self.product.has_options() {
            return None;
        }
        if selection.is_empty() {
            return self.product.default_variant();
        }

        let variants = &self.product.variants;
        if self.is_complete(selection) {
            return self
                .index
                .exact(&selection.key())
                .and_then(|position| variants.get(position));
        }

        let constraints: Vec<(&str, &str)> = selection.iter().collect();
        match self.index.consistent(&constraints).as_slice() {
            [position] => variants.get(*position),
            _ => None,
        }
    }

    pub fn matching_variant(&self) -> Option<&Variant> {
        self.compute_matching_variant(&self.selection)
    }

    /// Whether choosing `value` for `option` keeps some variant reachable,
    /// given the values chosen for the *other* options.
    ///
    /// Reachability only: an out-of-stock combination stays selectable so the
    /// shopper can see it is out of stock. Unknown pairs are unavailable.
    pub fn is_option_value_available(&self, option: &str, value: &str) -> bool {
        let declared = self
            .product
            .option(option)
            .is_some_and(|o| o.declares(value));
        if !declared {
            return false;
        }

        let mut constraints: Vec<(&str, &str)> = self
            .selection
            .iter()
            .filter(|(selected_option, _)| *selected_option != option)
            .collect();
        constraints.push((option, value));
        self.index.any_consistent(&constraints)
    }

    pub fn price_quote(&self) -> PriceQuote {
        PriceQuote::derive(&self.product, self.matching_variant())
    }

    pub fn current_price(&self) -> Money {
        self.price_quote().current_price
    }

    pub fn current_compare_at(&self) -> Option<Money> {
        self.price_quote().compare_at
    }

    pub fn discount_percentage(&self) -> Option<u8> {
        self.price_quote().discount_percentage
    }

    pub fn in_stock(&self) -> bool {
        self.stock_for(self.matching_variant())
    }

    /// Whether the shopper has options to choose.
    pub fn has_variants(&self) -> bool {
        self.product.has_options()
    }

    /// Every declared option has a chosen value.
    pub fn is_fully_selected(&self) -> bool {
        self.is_complete(&self.selection)
    }

    pub fn can_add_to_cart(&self) -> bool {
        self.eligible(self.stock_for(self.matching_variant()))
    }

    /// Image for the current selection: the variant override, else the
    /// product's primary image.
    pub fn current_image(&self) -> Option<&str> {
        self.matching_variant()
            .and_then(|variant| variant.image.as_deref())
            .or_else(|| self.product.primary_image())
    }

    /// The cart request "add to cart" would send, or `None` while it is disabled.
    pub fn line_item_request(&self, quantity: u32) -> Option<LineItemRequest> {
        let matched = self.matching_variant();
        if !self.eligible(self.stock_for(matched)) {
            return None;
        }

        Some(LineItemRequest {
            product_id: self.product.id,
            variant_id: matched.map(|variant| variant.id),
            options: self.selection.as_map().clone(),
            unit_price: PriceQuote::derive(&self.product, matched).current_price,
            quantity,
        })
    }

    /// Add the current selection to `cart` with the configured default quantity.
    ///
    /// While `can_add_to_cart` is false this is a no-op returning `Ok(None)`.
    pub fn handle_add_to_cart<S>(&self, cart: &S) -> Result<Option<CartLine>, CartError>
    where
        S: CartStore + ?Sized,
    {
        self.handle_add_to_cart_with_quantity(cart, self.config.default_quantity)
    }

    pub fn handle_add_to_cart_with_quantity<S>(
        &self,
        cart: &S,
        quantity: u32,
    ) -> Result<Option<CartLine>, CartError>
    where
        S: CartStore + ?Sized,
    {
        let Some(request) = self.line_item_request(quantity) else {
            tracing::debug!(
                product_id = %self.product.id,
                fully_selected = self.is_fully_selected(),
                "add to cart ignored; selection incomplete or out of stock"
            );
            return Ok(None);
        };

        cart.add_line_item(request).map(Some)
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        let matched = self.matching_variant();
        let quote = PriceQuote::derive(&self.product, matched);
        let in_stock = self.stock_for(matched);

        let options = self
            .product
            .options
            .iter()
            .map(|option| {
                let selected = self.selection.get(&option.name);
                let values = option
                    .values
                    .iter()
                    .map(|value| OptionValueView {
                        value: value.clone(),
                        swatch: option.swatch_for(value).map(str::to_string),
                        selected: selected == Some(value.as_str()),
                        available: self.is_option_value_available(&option.name, value),
                    })
                    .filter(|view| {
                        view.available || self.config.unavailable_values != UnavailableValuePolicy::Hide
                    })
                    .collect();
                OptionView {
                    name: option.name.clone(),
                    values,
                }
            })
            .collect();

        ResolverSnapshot {
            product_id: self.product.id,
            selected: self.selection.as_map().clone(),
            matching_variant_id: matched.map(|variant| variant.id),
            options,
            current_price: quote.current_price,
            current_compare_at: quote.compare_at,
            discount_percentage: quote.discount_percentage,
            in_stock,
            has_variants: self.has_variants(),
            can_add_to_cart: self.eligible(in_stock),
            image: matched
                .and_then(|variant| variant.image.clone())
                .or_else(|| self.product.primary_image().map(str::to_string)),
            featured: self.product.featured,
        }
    }

    fn is_complete(&self, selection: &Selection) -> bool {
        selection.len() == self.product.options.len()
            && self
                .product
                .options
                .iter()
                .all(|option| selection.contains(&option.name))
    }

    fn stock_for(&self, matched: Option<&Variant>) -> bool {
        match matched {
            Some(variant) => variant.is_in_stock(),
            // The product is its own purchasable unit only without variants.
            None => {
                (!self.product.has_options() || self.product.variants.is_empty())
                    && self.product.stock.is_in_stock()
            }
        }
    }

    fn eligible(&self, in_stock: bool) -> bool {
        in_stock && (!self.has_variants() || self.is_fully_selected())
    }
}
