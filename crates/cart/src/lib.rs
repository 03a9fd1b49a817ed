//! Shopping cart domain module.
//!
//! The cart is an event-sourced aggregate (commands decide events, events
//! evolve state) wrapped by a [`CartStore`] that serializes writes and
//! notifies subscribers. Lines are keyed by variant, so repeated adds of the
//! same variant merge quantities.

pub mod cart;
pub mod store;

pub use cart::{
    AddLineItem, Cart, CartCleared, CartCommand, CartEvent, CartLine, ClearCart, LineItemAdded,
    LineItemRemoved, LineItemRequest, LineKey, RemoveLineItem,
};
pub use store::{CartError, CartNotification, CartStore, InMemoryCartStore, Subscription};
