use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    Aggregate, AggregateRoot, CartId, DomainError, Event, Money, ProductId, VariantId,
};

/// Identity of a cart line: repeated adds of the same key merge quantities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKey {
    Variant(VariantId),
    /// Products without options are purchased as themselves.
    Product(ProductId),
}

impl LineKey {
    pub fn for_item(product_id: ProductId, variant_id: Option<VariantId>) -> Self {
        match variant_id {
            Some(variant_id) => LineKey::Variant(variant_id),
            None => LineKey::Product(product_id),
        }
    }
}

/// What a product view asks the cart to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    /// Option selection the shopper made, for display in the cart.
    pub options: BTreeMap<String, String>,
    /// Price in smallest currency unit at the moment of adding.
    pub unit_price: Money,
    pub quantity: u32,
}

impl LineItemRequest {
    pub fn key(&self) -> LineKey {
        LineKey::for_item(self.product_id, self.variant_id)
    }
}

/// Cart line: one variant (or option-less product) with a merged quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_no: u32,
    pub key: LineKey,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub options: BTreeMap<String, String>,
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Aggregate root: Cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    next_line_no: u32,
    version: u64,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            next_line_no: 1,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines (the cart badge count).
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of line totals, or `None` if any line or the sum overflows.
    pub fn subtotal(&self) -> Option<Money> {
        self.lines
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.line_total()?))
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddLineItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLineItem {
    pub cart_id: CartId,
    pub item: LineItemRequest,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLineItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLineItem {
    pub cart_id: CartId,
    pub key: LineKey,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddLineItem(AddLineItem),
    RemoveLineItem(RemoveLineItem),
    ClearCart(ClearCart),
}

/// Event: LineItemAdded. Merges into the existing line for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemAdded {
    pub cart_id: CartId,
    pub line_no: u32,
    pub item: LineItemRequest,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRemoved {
    pub cart_id: CartId,
    pub key: LineKey,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineItemAdded(LineItemAdded),
    LineItemRemoved(LineItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineItemAdded(_) => "cart.line_item.added",
            CartEvent::LineItemRemoved(_) => "cart.line_item.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineItemAdded(e) => e.occurred_at,
            CartEvent::LineItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineItemAdded(e) => {
                let key = e.item.key();
                if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
                    line.quantity = line.quantity.saturating_add(e.item.quantity);
                    // Latest quote wins for repeated adds.
                    line.unit_price = e.item.unit_price;
                } else {
                    self.lines.push(CartLine {
                        line_no: e.line_no,
                        key,
                        product_id: e.item.product_id,
                        variant_id: e.item.variant_id,
                        options: e.item.options.clone(),
                        unit_price: e.item.unit_price,
                        quantity: e.item.quantity,
                    });
                    self.next_line_no = self.next_line_no.max(e.line_no.saturating_add(1));
                }
            }
            CartEvent::LineItemRemoved(e) => {
                self.lines.retain(|l| l.key != e.key);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddLineItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveLineItem(cmd) => self.handle_remove(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Cart {
    fn ensure_cart_id(&self, cart_id: CartId) -> Result<(), DomainError> {
        if self.id != cart_id {
            return Err(DomainError::invariant("cart_id mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddLineItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        if cmd.item.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let line_no = match self.line(cmd.item.key()) {
            Some(existing) => {
                if existing.quantity.checked_add(cmd.item.quantity).is_none() {
                    return Err(DomainError::validation("line quantity overflow"));
                }
                existing.line_no
            }
            None => self.next_line_no,
        };

        Ok(vec![CartEvent::LineItemAdded(LineItemAdded {
            cart_id: cmd.cart_id,
            line_no,
            item: cmd.item.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveLineItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        if self.line(cmd.key).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::LineItemRemoved(LineItemRemoved {
            cart_id: cmd.cart_id,
            key: cmd.key,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        if self.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![CartEvent::CartCleared(CartCleared {
            cart_id: cmd.cart_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
