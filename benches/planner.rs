use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fuel_dispatch::{Dispatcher, FuelType, Order, OrderId, OrderStatus, Quantity};

const STREETS: [&str; 6] = [
    "Freedom Way",
    "Admiralty Way",
    "Broad St",
    "Awolowo Rd",
    "Freedom Way East",
    "Ozumba Mbadiwe Ave",
];
const NEIGHBORHOODS: [&str; 4] = ["Ikoyi", "Lekki Phase 1", "VGC", "Victoria Island"];
const FUELS: [FuelType; 3] = [FuelType::Petrol, FuelType::Diesel, FuelType::Kerosene];

/// Generates pending orders spread over a fixed set of streets and neighborhoods.
///
/// Pattern per order `n`:
/// - street and neighborhood rotate on co-prime periods
/// - quantity cycles 10, 20, 30, 40 liters
/// - one order every two minutes
pub struct OrderGenerator {
    next_id: OrderId,
    count: u64,
    start: DateTime<Utc>,
}

impl OrderGenerator {
    pub fn new(count: u64) -> Self {
        Self {
            next_id: 0,
            count,
            start: Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(),
        }
    }
}

impl Iterator for OrderGenerator {
    type Item = Order;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_id >= self.count {
            return None;
        }
        let n = self.next_id;
        self.next_id += 1;

        let i = n as usize;
        Some(Order {
            id: n,
            customer_phone: format!("080{:08}", n % 500),
            delivery_address: format!("{} {}, Lagos", i % 50 + 1, STREETS[i % STREETS.len()]),
            neighborhood: NEIGHBORHOODS[i % NEIGHBORHOODS.len()].to_string(),
            fuel_type: FUELS[i % FUELS.len()],
            quantity: Quantity::from_liters(10 * (n as u32 % 4 + 1)),
            created_at: self.start + Duration::minutes(2 * n as i64),
            status: OrderStatus::Pending,
        })
    }
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    let dispatcher = Dispatcher::default();

    // quadratic pass, keep sizes at dispatch scale
    for count in [10u64, 50, 200] {
        let orders: Vec<Order> = OrderGenerator::new(count).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &orders, |b, orders| {
            b.iter(|| black_box(dispatcher.group_by_location_and_time(orders).len()));
        });
    }

    group.finish();
}

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");
    let dispatcher = Dispatcher::default();

    for count in [100u64, 1_000, 10_000] {
        let orders: Vec<Order> = OrderGenerator::new(count).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &orders, |b, orders| {
            b.iter(|| black_box(dispatcher.plan_batches(orders).batches.len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_planning);
criterion_main!(benches);
