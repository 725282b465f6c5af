//! Dispatch capacity and batching engine.
//!
//! Every operation is a pure function over a caller-supplied snapshot of
//! orders. The engine holds no rider state and never changes an order's
//! status, so a [`Dispatcher`] can be shared across threads freely.

use chrono::{DateTime, Utc};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::Quantity;
use crate::config::DispatchConfig;
use crate::model::{Order, Priority};

pub mod address;
pub mod capacity;
pub mod estimate;
pub mod grouping;
pub mod planner;
pub mod priority;

pub use address::{AddressMatcher, StreetKeyMatcher, SubstringStreetMatcher};
pub use capacity::CapacityState;
pub use planner::{Batch, BatchPlan};

mod error;
pub use error::{AssignmentError, ConfigError, IntakeError};

/// Engine operations bound to one [`DispatchConfig`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

/// Public API
impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Drain a stream of orders into an owned snapshot, in arrival order.
    pub async fn collect(mut stream: impl Stream<Item = Order> + Unpin) -> Vec<Order> {
        let mut snapshot = Vec::new();
        while let Some(order) = stream.next().await {
            snapshot.push(order);
        }
        debug!(orders = snapshot.len(), "snapshot collected");
        snapshot
    }

    pub fn is_valid_quantity(&self, liters: i64) -> bool {
        capacity::is_valid_quantity(&self.config, liters)
    }

    pub fn remaining_capacity<'a>(
        &self,
        active: impl IntoIterator<Item = &'a Order>,
    ) -> CapacityState {
        capacity::remaining_capacity(&self.config, active)
    }

    pub fn can_assign_order<'a>(
        &self,
        liters: i64,
        active: impl IntoIterator<Item = &'a Order>,
    ) -> bool {
        capacity::can_assign_order(&self.config, liters, active)
    }

    pub fn has_enough_kegs<'a>(
        &self,
        liters: i64,
        active: impl IntoIterator<Item = &'a Order>,
    ) -> bool {
        capacity::has_enough_kegs(&self.config, liters, active)
    }

    /// Check whether an order of `liters` can go on a rider carrying `active`.
    pub fn check_assignment<'a>(
        &self,
        liters: i64,
        active: impl IntoIterator<Item = &'a Order>,
    ) -> Result<(), AssignmentError> {
        let result = capacity::check_assignment(&self.config, liters, active);
        match &result {
            Ok(()) => info!(liters, "assignment accepted"),
            Err(e) => info!(liters, reason = %e, "assignment rejected"),
        }
        result
    }

    /// Check whether a new submission should be taken in: the quantity is
    /// orderable and it does not repeat a recent order.
    pub fn check_intake(
        &self,
        candidate: &Order,
        recent: &[Order],
        now: DateTime<Utc>,
    ) -> Result<(), IntakeError> {
        let result = self.intake_result(candidate, recent, now);
        match &result {
            Ok(()) => info!(order = candidate.id, "intake accepted"),
            Err(e) => info!(order = candidate.id, reason = %e, "intake rejected"),
        }
        result
    }

    pub fn group_by_location_and_time<'a>(&self, orders: &'a [Order]) -> Vec<Vec<&'a Order>> {
        self.group_with(orders, &SubstringStreetMatcher)
    }

    pub fn group_with<'a, M>(&self, orders: &'a [Order], matcher: &M) -> Vec<Vec<&'a Order>>
    where
        M: AddressMatcher + ?Sized,
    {
        let groups = grouping::group_with(orders, self.config.grouping_window(), matcher);
        debug!(orders = orders.len(), groups = groups.len(), "orders grouped");
        groups
    }

    /// Plan batches for one full box.
    pub fn plan_batches<'a>(&self, orders: &'a [Order]) -> BatchPlan<'a> {
        self.plan_batches_with_capacity(orders, self.config.max_box_capacity())
    }

    pub fn plan_batches_with_capacity<'a>(
        &self,
        orders: &'a [Order],
        max_capacity: Quantity,
    ) -> BatchPlan<'a> {
        let plan = planner::plan_batches(&self.config.timing, orders, max_capacity);
        for order in &plan.oversized {
            warn!(
                order = order.id,
                quantity = %order.quantity,
                capacity = %max_capacity,
                "order exceeds batch capacity"
            );
        }
        info!(
            orders = orders.len(),
            batches = plan.batches.len(),
            planned = %plan.planned_quantity(),
            "batches planned"
        );
        plan
    }

    pub fn estimate_batch_time(&self, orders: &[&Order]) -> u32 {
        estimate::estimate_batch_time(&self.config.timing, orders)
    }

    /// Estimate one delivery; `None` uses the configured default distance.
    pub fn estimate_single_delivery_time(&self, order: &Order, distance_km: Option<f64>) -> u32 {
        let distance_km = distance_km.unwrap_or(self.config.timing.default_distance_km);
        estimate::estimate_single_delivery_time(&self.config.timing, order, distance_km)
    }

    pub fn delivery_priority(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Priority {
        priority::delivery_priority(&self.config, created_at, now)
    }

    pub fn is_duplicate(&self, candidate: &Order, recent: &[Order], now: DateTime<Utc>) -> bool {
        priority::is_duplicate(candidate, recent, now, self.config.duplicate_window())
    }
}

/// Private API
impl Dispatcher {
    fn intake_result(
        &self,
        candidate: &Order,
        recent: &[Order],
        now: DateTime<Utc>,
    ) -> Result<(), IntakeError> {
        if !self.is_valid_quantity(i64::from(candidate.quantity.liters())) {
            return Err(IntakeError::InvalidQuantity(candidate.quantity));
        }
        let window = self.config.duplicate_window();
        if let Some(existing) = priority::find_duplicate(candidate, recent, now, window) {
            return Err(IntakeError::Duplicate {
                existing: existing.id,
            });
        }
        Ok(())
    }
}
