use std::env;
use std::io;
use std::process::ExitCode;

use chrono::Utc;
use fuel_dispatch::csv::{read_orders, write_plan};
use fuel_dispatch::{DispatchConfig, Dispatcher, Order, OrderStatus};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "warn".parse().expect("static directive is valid"),
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: fuel-dispatch <orders.csv> [config.json]");
        return ExitCode::FAILURE;
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let config = match args.next() {
        Some(config_path) => match DispatchConfig::from_json_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => DispatchConfig::default(),
    };
    let dispatcher = match Dispatcher::new(config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let rows = match read_orders(path.clone()) {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (order_sender, order_receiver) = tokio::sync::mpsc::channel(16);
    let intake = dispatcher.clone();

    tokio::spawn(async move {
        for result in rows {
            match result {
                Ok(order) if order.status != OrderStatus::Pending => {}
                Ok(order) if !intake.is_valid_quantity(i64::from(order.quantity.liters())) => {
                    warn!(order = order.id, quantity = %order.quantity, "invalid quantity");
                }
                Ok(order) => {
                    if order_sender.send(order).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let pending = Dispatcher::collect(ReceiverStream::new(order_receiver)).await;
    let plan = dispatcher.plan_batches(&pending);

    let now = Utc::now();
    let priority = |order: &Order| dispatcher.delivery_priority(order.created_at, now);
    if let Err(e) = write_plan(&plan, priority, io::stdout().lock()) {
        error!("failed to write batches: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
