//! `storefront-core` — shared storefront domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, money, the domain error model and the aggregate/event traits
//! used by the catalog, cart and variant crates.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{CartId, CollectionId, ProductId, VariantId};
pub use money::Money;
pub use value_object::ValueObject;
