use std::fmt;

use serde::{Deserialize, Serialize};

/// Fuel quantity in whole liters.
///
/// Any value can be represented; whether it is an orderable size is decided
/// by the capacity model against a [`DispatchConfig`](crate::DispatchConfig).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn from_liters(liters: u32) -> Self {
        Quantity(liters)
    }

    pub fn liters(self) -> u32 {
        self.0
    }

    /// Number of kegs occupied, a partial keg counts as a whole one.
    /// A zero keg size holds nothing and yields 0.
    pub fn kegs_ceil(self, keg_size: u32) -> u32 {
        if keg_size == 0 {
            return 0;
        }
        self.0.div_ceil(keg_size)
    }

    /// Number of whole kegs that fit in this quantity.
    pub fn kegs_floor(self, keg_size: u32) -> u32 {
        self.0.checked_div(keg_size).unwrap_or(0)
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Quantity(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}L", self.0)
    }
}

impl std::ops::Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, |acc, q| acc + q)
    }
}
