use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::engine::BatchPlan;
use crate::model::{FuelType, OrderStatus, Priority};
use crate::{Order, OrderId, Quantity};

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized fuel type '{fuel_type}'")]
    UnrecognizedFuel { line: usize, fuel_type: String },

    #[error("line {line}: unrecognized status '{status}'")]
    UnrecognizedStatus { line: usize, status: String },

    #[error("line {line}: invalid timestamp '{value}'")]
    Timestamp { line: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    id: OrderId,
    customer_phone: String,
    delivery_address: String,
    neighborhood: String,
    fuel_type: String,
    quantity: u32,
    created_at: String,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    batch: usize,
    order: OrderId,
    neighborhood: &'a str,
    quantity: u32,
    batch_total: u32,
    estimated_minutes: u32,
    priority: Priority,
}

fn parse_fuel(line: usize, raw: &str) -> Result<FuelType, CsvError> {
    match raw {
        "petrol" => Ok(FuelType::Petrol),
        "diesel" => Ok(FuelType::Diesel),
        "kerosene" => Ok(FuelType::Kerosene),
        other => Err(CsvError::UnrecognizedFuel {
            line,
            fuel_type: other.to_string(),
        }),
    }
}

fn parse_status(line: usize, raw: Option<&str>) -> Result<OrderStatus, CsvError> {
    match raw {
        None | Some("") | Some("pending") => Ok(OrderStatus::Pending),
        Some("assigned") => Ok(OrderStatus::Assigned),
        Some("accepted") => Ok(OrderStatus::Accepted),
        Some("in_progress") => Ok(OrderStatus::InProgress),
        Some("delivered") => Ok(OrderStatus::Delivered),
        Some("cancelled") => Ok(OrderStatus::Cancelled),
        Some(other) => Err(CsvError::UnrecognizedStatus {
            line,
            status: other.to_string(),
        }),
    }
}

fn parse_order(line: usize, row: InputRow) -> Result<Order, CsvError> {
    let created_at = row
        .created_at
        .parse::<DateTime<Utc>>()
        .map_err(|_| CsvError::Timestamp {
            line,
            value: row.created_at.clone(),
        })?;

    Ok(Order {
        id: row.id,
        customer_phone: row.customer_phone,
        delivery_address: row.delivery_address,
        neighborhood: row.neighborhood,
        fuel_type: parse_fuel(line, &row.fuel_type)?,
        quantity: Quantity::from_liters(row.quantity),
        created_at,
        status: parse_status(line, row.status.as_deref())?,
    })
}

/// Read orders from a csv file
pub fn read_orders(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Order, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_order(line, row)
        }))
}

/// Write one csv row per planned order, batches numbered from 1
pub fn write_plan(
    plan: &BatchPlan<'_>,
    priority: impl Fn(&Order) -> Priority,
    writer: impl io::Write,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for (idx, batch) in plan.batches.iter().enumerate() {
        for order in &batch.orders {
            writer.serialize(OutputRow {
                batch: idx + 1,
                order: order.id,
                neighborhood: batch.neighborhood,
                quantity: order.quantity.liters(),
                batch_total: batch.total_quantity.liters(),
                estimated_minutes: batch.estimated_time_minutes,
                priority: priority(order),
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::engine::planner::plan_batches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "id,customer_phone,delivery_address,neighborhood,fuel_type,quantity,created_at,status\n";

    fn write_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(rows.as_bytes()).unwrap();
        file
    }

    fn read(rows: &str) -> Vec<Result<Order, CsvError>> {
        let file = write_csv(rows);
        read_orders(file.path()).unwrap().collect()
    }

    #[test]
    fn read_order() {
        let results = read(
            "7,08012345678,\"7 Freedom Way, Lekki\",Lekki Phase 1,diesel,20,2024-03-01T09:00:00Z,assigned\n",
        );
        assert_eq!(results.len(), 1);

        let order = results.into_iter().next().unwrap().unwrap();
        assert_eq!(order.id, 7);
        assert_eq!(order.delivery_address, "7 Freedom Way, Lekki");
        assert_eq!(order.neighborhood, "Lekki Phase 1");
        assert_eq!(order.fuel_type, FuelType::Diesel);
        assert_eq!(order.quantity, Quantity::from_liters(20));
        assert_eq!(order.status, OrderStatus::Assigned);
        assert_eq!(order.created_at.to_rfc3339(), "2024-03-01T09:00:00+00:00");
    }

    #[test]
    fn missing_status_is_pending() {
        let results = read("1,080,Broad St,VGC,petrol,10,2024-03-01T09:00:00Z,\n");
        assert_eq!(results[0].as_ref().unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn read_with_whitespace() {
        let results = read("1, 080, Broad St, VGC, petrol, 10, 2024-03-01T09:00:00+01:00, pending\n");
        let order = results[0].as_ref().unwrap();
        assert_eq!(order.neighborhood, "VGC");
        assert_eq!(order.created_at.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn read_returns_error_for_unknown_fuel() {
        let results = read("1,080,Broad St,VGC,jet_a1,10,2024-03-01T09:00:00Z,pending\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedFuel { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_unknown_status() {
        let results = read("1,080,Broad St,VGC,petrol,10,2024-03-01T09:00:00Z,lost\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedStatus { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_bad_timestamp() {
        let results = read("1,080,Broad St,VGC,petrol,10,yesterday,pending\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::Timestamp { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_negative_quantity() {
        let results = read(
            "1,080,Broad St,VGC,petrol,-10,2024-03-01T09:00:00Z,pending\n\
             2,080,Broad St,VGC,petrol,10,2024-03-01T09:00:00Z,pending\n",
        );
        assert!(matches!(results[0], Err(CsvError::Parse { line: 2, .. })));
        assert!(results[1].is_ok());
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(matches!(
            read_orders("/nonexistent/orders.csv"),
            Err(CsvError::Open { .. })
        ));
    }

    #[test]
    fn write_plan_rows() {
        let orders: Vec<Order> = read(
            "1,080,Freedom Way,Lekki Phase 1,petrol,20,2024-03-01T09:00:00Z,\n\
             2,081,Freedom Way,Lekki Phase 1,petrol,10,2024-03-01T09:05:00Z,\n\
             3,082,Broad St,VGC,petrol,30,2024-03-01T09:10:00Z,\n",
        )
        .into_iter()
        .map(Result::unwrap)
        .collect();
        let plan = plan_batches(&TimingConfig::default(), &orders, Quantity::from_liters(40));

        let mut out = Vec::new();
        write_plan(&plan, |_| Priority::Normal, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "batch,order,neighborhood,quantity,batch_total,estimated_minutes,priority"
        );
        assert_eq!(lines[1], "1,1,Lekki Phase 1,20,30,35,normal");
        assert_eq!(lines[2], "1,2,Lekki Phase 1,10,30,35,normal");
        assert_eq!(lines[3], "2,3,VGC,30,30,26,normal");
    }
}
