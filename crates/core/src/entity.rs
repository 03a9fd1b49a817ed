//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog records (products, variants, collections) are entities: two records
/// with the same id describe the same thing even if a later fetch changed
/// their title or price.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
