//! Cart store: the shared, serialized owner of a shopper's cart.
//!
//! Every product view writes through a [`CartStore`]. Writes are serialized
//! behind a lock so concurrent "add to cart" calls from several views merge
//! into one line per key. Accepted writes fan out a [`CartNotification`] to
//! subscribers (cart badge, confirmation toast).

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use storefront_core::aggregate::execute;
use storefront_core::{CartId, DomainError};

use crate::cart::{
    AddLineItem, Cart, CartCommand, CartLine, ClearCart, LineItemRequest, LineKey, RemoveLineItem,
};

#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("cart lock poisoned")]
    Poisoned,
}

/// Published after each accepted cart write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotification {
    ItemAdded { line: CartLine, total_items: u64 },
    ItemRemoved { key: LineKey, total_items: u64 },
    Cleared,
}

/// A subscription to cart notifications.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<CartNotification>,
}

impl Subscription {
    fn new(receiver: Receiver<CartNotification>) -> Self {
        Self { receiver }
    }

    pub fn try_recv(&self) -> Result<CartNotification, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<CartNotification, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything published so far, without blocking.
    pub fn drain(&self) -> Vec<CartNotification> {
        self.receiver.try_iter().collect()
    }
}

/// Cart write/read contract used by product views.
pub trait CartStore: Send + Sync {
    /// Add (or merge into) the line for the request's key; returns the line
    /// as it stands after the write.
    fn add_line_item(&self, item: LineItemRequest) -> Result<CartLine, CartError>;

    fn remove_line_item(&self, key: LineKey) -> Result<(), CartError>;

    fn clear(&self) -> Result<(), CartError>;

    fn lines(&self) -> Vec<CartLine>;

    /// Sum of quantities over all lines.
    fn total_items(&self) -> u64;

    fn subscribe(&self) -> Subscription;
}

impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    fn add_line_item(&self, item: LineItemRequest) -> Result<CartLine, CartError> {
        (**self).add_line_item(item)
    }

    fn remove_line_item(&self, key: LineKey) -> Result<(), CartError> {
        (**self).remove_line_item(key)
    }

    fn clear(&self) -> Result<(), CartError> {
        (**self).clear()
    }

    fn lines(&self) -> Vec<CartLine> {
        (**self).lines()
    }

    fn total_items(&self) -> u64 {
        (**self).total_items()
    }

    fn subscribe(&self) -> Subscription {
        (**self).subscribe()
    }
}

/// In-memory, session-scoped cart store.
#[derive(Debug)]
pub struct InMemoryCartStore {
    cart: Mutex<Cart>,
    subscribers: Mutex<Vec<Sender<CartNotification>>>,
}

impl InMemoryCartStore {
    pub fn new(cart_id: CartId) -> Self {
        Self {
            cart: Mutex::new(Cart::new(cart_id)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the current cart state.
    pub fn snapshot(&self) -> Result<Cart, CartError> {
        let cart = self.cart.lock().map_err(|_| CartError::Poisoned)?;
        Ok(cart.clone())
    }

    fn publish(&self, notification: CartNotification) {
        let Ok(mut subs) = self.subscribers.lock() else {
            tracing::warn!("cart subscribers lock poisoned; notification dropped");
            return;
        };
        // Drop subscribers whose receiving end is gone.
        subs.retain(|tx| tx.send(notification.clone()).is_ok());
    }
}

impl Default for InMemoryCartStore {
    fn default() -> Self {
        Self::new(CartId::new())
    }
}

impl CartStore for InMemoryCartStore {
    fn add_line_item(&self, item: LineItemRequest) -> Result<CartLine, CartError> {
        let key = item.key();
        let (line, total_items) = {
            let mut cart = self.cart.lock().map_err(|_| CartError::Poisoned)?;
            let command = CartCommand::AddLineItem(AddLineItem {
                cart_id: cart.id_typed(),
                item,
                occurred_at: Utc::now(),
            });
            execute(&mut *cart, &command)?;
            let line = cart
                .line(key)
                .cloned()
                .ok_or_else(|| DomainError::invariant("added line missing from cart"))?;
            (line, cart.total_items())
        };

        tracing::info!(
            line_no = line.line_no,
            product_id = %line.product_id,
            quantity = line.quantity,
            unit_price = line.unit_price.cents(),
            total_items,
            "cart line item added"
        );
        self.publish(CartNotification::ItemAdded {
            line: line.clone(),
            total_items,
        });
        Ok(line)
    }

    fn remove_line_item(&self, key: LineKey) -> Result<(), CartError> {
        let total_items = {
            let mut cart = self.cart.lock().map_err(|_| CartError::Poisoned)?;
            let command = CartCommand::RemoveLineItem(RemoveLineItem {
                cart_id: cart.id_typed(),
                key,
                occurred_at: Utc::now(),
            });
            execute(&mut *cart, &command)?;
            cart.total_items()
        };

        tracing::info!(?key, total_items, "cart line item removed");
        self.publish(CartNotification::ItemRemoved { key, total_items });
        Ok(())
    }

    fn clear(&self) -> Result<(), CartError> {
        let events = {
            let mut cart = self.cart.lock().map_err(|_| CartError::Poisoned)?;
            let command = CartCommand::ClearCart(ClearCart {
                cart_id: cart.id_typed(),
                occurred_at: Utc::now(),
            });
            execute(&mut *cart, &command)?
        };

        if !events.is_empty() {
            tracing::info!("cart cleared");
            self.publish(CartNotification::Cleared);
        }
        Ok(())
    }

    fn lines(&self) -> Vec<CartLine> {
        match self.cart.lock() {
            Ok(cart) => cart.lines().to_vec(),
            Err(_) => vec![],
        }
    }

    fn total_items(&self) -> u64 {
        match self.cart.lock() {
            Ok(cart) => cart.total_items(),
            Err(_) => 0,
        }
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never fires.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
