//! Quantity and capacity rules. Every function expects a `config` that passed
//! [`DispatchConfig::validate`]; a zero keg size answers "invalid" / "no kegs".

use crate::Quantity;
use crate::config::DispatchConfig;
use crate::model::Order;

use super::AssignmentError;

/// Load of a rider's box, recomputed from the active deliveries on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityState {
    pub used: Quantity,
    pub remaining: Quantity,
    /// Rounded up: a partial keg still occupies a slot.
    pub used_kegs: u32,
    /// Rounded down: a partial keg is never promised.
    pub remaining_kegs: u32,
    pub total_kegs: u32,
}

impl CapacityState {
    /// Whether the active deliveries exceed the box, in which case
    /// `used + remaining` is larger than the box capacity.
    pub fn is_overloaded(&self, config: &DispatchConfig) -> bool {
        self.used > config.max_box_capacity()
    }
}

/// Whether `liters` is one of the orderable sizes: a positive multiple of the
/// keg size not exceeding one box.
pub fn is_valid_quantity(config: &DispatchConfig, liters: i64) -> bool {
    let keg = i64::from(config.keg_size_liters);
    let max = i64::from(config.max_box_capacity().liters());
    liters > 0 && liters.checked_rem(keg) == Some(0) && liters <= max
}

/// Sum the deliveries that occupy the box (assigned, accepted, in progress).
pub fn remaining_capacity<'a>(
    config: &DispatchConfig,
    active: impl IntoIterator<Item = &'a Order>,
) -> CapacityState {
    let keg = config.keg_size_liters;
    let used: Quantity = active
        .into_iter()
        .filter(|order| order.status.is_active())
        .map(|order| order.quantity)
        .sum();
    let remaining = config.max_box_capacity().saturating_sub(used);

    CapacityState {
        used,
        remaining,
        used_kegs: used.kegs_ceil(keg),
        remaining_kegs: remaining.kegs_floor(keg),
        total_kegs: config.kegs_per_box,
    }
}

/// Liter-level check: the size is orderable and fits in the remaining liters.
pub fn can_assign_order<'a>(
    config: &DispatchConfig,
    liters: i64,
    active: impl IntoIterator<Item = &'a Order>,
) -> bool {
    if !is_valid_quantity(config, liters) {
        return false;
    }
    let remaining = remaining_capacity(config, active).remaining;
    liters <= i64::from(remaining.liters())
}

/// Keg-level check: the kegs needed, rounded up, fit in the free kegs,
/// rounded down.
pub fn has_enough_kegs<'a>(
    config: &DispatchConfig,
    liters: i64,
    active: impl IntoIterator<Item = &'a Order>,
) -> bool {
    let Ok(liters) = u32::try_from(liters) else {
        return false;
    };
    if config.keg_size_liters == 0 {
        return false;
    }
    let needed = Quantity::from_liters(liters).kegs_ceil(config.keg_size_liters);
    needed <= remaining_capacity(config, active).remaining_kegs
}

/// Typed form of the assignment rules: validity, then liters, then kegs.
pub fn check_assignment<'a>(
    config: &DispatchConfig,
    liters: i64,
    active: impl IntoIterator<Item = &'a Order>,
) -> Result<(), AssignmentError> {
    if !is_valid_quantity(config, liters) {
        return Err(AssignmentError::InvalidQuantity(liters));
    }
    // valid quantities are bounded by the box, so this cannot truncate
    let requested = Quantity::from_liters(liters as u32);
    let state = remaining_capacity(config, active);

    if requested > state.remaining {
        return Err(AssignmentError::InsufficientCapacity {
            requested,
            remaining: state.remaining,
        });
    }

    let needed = requested.kegs_ceil(config.keg_size_liters);
    if needed > state.remaining_kegs {
        return Err(AssignmentError::InsufficientKegs {
            requested: needed,
            remaining: state.remaining_kegs,
        });
    }
    Ok(())
}
