//! Monetary amounts in the smallest currency unit.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A non-negative amount in the smallest currency unit (e.g. cents).
///
/// Currency selection and formatting happen at the presentation edge; every
/// amount inside one storefront is in the shop currency.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// `self * quantity`, or `None` on overflow.
    pub fn checked_mul(self, quantity: u64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl ValueObject for Money {}
