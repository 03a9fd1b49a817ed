//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values:
/// two `Money` amounts of 4000 cents are the same price, and two combination
/// keys built from the same option/value pairs address the same variant.
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
