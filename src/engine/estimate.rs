use std::collections::HashSet;

use crate::config::TimingConfig;
use crate::model::Order;

/// Estimated duration of a delivery run, in minutes.
///
/// A run over one neighborhood starts from a discounted complexity; mixed
/// fuel types and large orders add on top of that base.
pub fn estimate_batch_time(timing: &TimingConfig, orders: &[&Order]) -> u32 {
    let Some(first) = orders.first() else {
        return 0;
    };
    let stops = orders.len() as f64;

    let delivery = stops * f64::from(timing.per_delivery_minutes);
    let travel = f64::from(timing.base_travel_minutes)
        + (stops - 1.0) * f64::from(timing.between_stops_minutes);

    let mut complexity = 1.0;
    if orders.iter().all(|o| o.neighborhood == first.neighborhood) {
        complexity = timing.same_neighborhood_complexity;
    }
    let fuel_types: HashSet<_> = orders.iter().map(|o| o.fuel_type).collect();
    if fuel_types.len() > 1 {
        complexity += timing.mixed_fuel_penalty;
    }
    if orders
        .iter()
        .any(|o| o.quantity.liters() >= timing.large_order_liters)
    {
        complexity += timing.large_order_penalty;
    }

    ((delivery + travel) * complexity * timing.traffic_buffer).round() as u32
}

/// Estimated duration of a single delivery over `distance_km`, in minutes.
///
/// Independent of the batch formula. Panics on a negative or non-finite distance.
pub fn estimate_single_delivery_time(
    timing: &TimingConfig,
    _order: &Order,
    distance_km: f64,
) -> u32 {
    assert!(
        distance_km.is_finite() && distance_km >= 0.0,
        "distance must be a finite non-negative number of km, got {distance_km}"
    );
    let driving = distance_km / timing.single_speed_kmh * 60.0;
    ((driving + timing.single_handling_minutes) * timing.single_buffer).round() as u32
}
