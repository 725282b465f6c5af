pub mod config;
pub mod csv;
pub mod engine;
pub mod model;
pub mod quantity;

pub use config::{DispatchConfig, TimingConfig};
pub use engine::Dispatcher;
pub use model::{FuelType, Order, OrderId, OrderStatus, Priority};
pub use quantity::Quantity;
