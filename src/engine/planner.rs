use crate::Quantity;
use crate::config::TimingConfig;
use crate::model::Order;

use super::estimate::estimate_batch_time;

/// Orders carried together on one rider run.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<'a> {
    pub orders: Vec<&'a Order>,
    pub total_quantity: Quantity,
    pub neighborhood: &'a str,
    pub estimated_time_minutes: u32,
}

/// Output of [`plan_batches`].
///
/// Batches plus oversized orders cover every input order exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan<'a> {
    pub batches: Vec<Batch<'a>>,
    /// Orders larger than the capacity on their own; they fit no batch.
    pub oversized: Vec<&'a Order>,
}

impl BatchPlan<'_> {
    pub fn planned_quantity(&self) -> Quantity {
        self.batches.iter().map(|b| b.total_quantity).sum()
    }
}

/// Batch under construction.
struct OpenBatch<'a> {
    orders: Vec<&'a Order>,
    total: Quantity,
    neighborhood: &'a str,
}

impl<'a> OpenBatch<'a> {
    fn start(order: &'a Order) -> Self {
        Self {
            orders: vec![order],
            total: order.quantity,
            neighborhood: &order.neighborhood,
        }
    }

    fn accepts(&self, order: &Order, max_capacity: Quantity) -> bool {
        self.total + order.quantity <= max_capacity && self.neighborhood == order.neighborhood
    }

    fn push(&mut self, order: &'a Order) {
        self.total += order.quantity;
        self.orders.push(order);
    }

    fn finish(self, timing: &TimingConfig) -> Batch<'a> {
        let estimated_time_minutes = estimate_batch_time(timing, &self.orders);
        Batch {
            orders: self.orders,
            total_quantity: self.total,
            neighborhood: self.neighborhood,
            estimated_time_minutes,
        }
    }
}

/// First-fit sequential packing over orders sorted by neighborhood, then age.
///
/// An order joins the open batch when it fits the remaining capacity and
/// shares its neighborhood, otherwise the open batch is closed and a new one
/// starts. Batches never exceed `max_capacity` and never mix neighborhoods.
/// Same-neighborhood batches are not merged back once closed.
pub fn plan_batches<'a>(
    timing: &TimingConfig,
    orders: &'a [Order],
    max_capacity: Quantity,
) -> BatchPlan<'a> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| {
        a.neighborhood
            .cmp(&b.neighborhood)
            .then(a.created_at.cmp(&b.created_at))
    });

    let mut plan = BatchPlan::default();
    let mut open: Option<OpenBatch<'a>> = None;

    for order in sorted {
        if order.quantity > max_capacity {
            plan.oversized.push(order);
            continue;
        }
        match open.as_mut() {
            Some(batch) if batch.accepts(order, max_capacity) => batch.push(order),
            _ => {
                if let Some(full) = open.replace(OpenBatch::start(order)) {
                    plan.batches.push(full.finish(timing));
                }
            }
        }
    }

    if let Some(last) = open {
        plan.batches.push(last.finish(timing));
    }

    plan
}
