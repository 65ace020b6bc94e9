//! Spreadsheet export of order listings
//!
//! Produces a CSV table that opens directly in a spreadsheet application.
//! Dates use the shop's `DD/MM/YYYY` format; missing values are empty cells.

use crate::core::error::{RepairError, RepairResult};
use crate::core::order::{OrderStatus, RepairOrder};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "Client")]
    client: &'a str,
    #[serde(rename = "Device")]
    device: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Cost")]
    cost: String,
    #[serde(rename = "Technical Note")]
    technical_note: &'a str,
    #[serde(rename = "Accessories")]
    accessories: &'a str,
    #[serde(rename = "Intake Date")]
    intake_date: String,
    #[serde(rename = "Repaired Date")]
    repaired_date: String,
    #[serde(rename = "Pickup Date")]
    pickup_date: String,
}

impl<'a> From<&'a RepairOrder> for ExportRow<'a> {
    fn from(order: &'a RepairOrder) -> Self {
        Self {
            id: order.id,
            client: &order.client_name,
            device: &order.device,
            phone: order.phone.as_deref().unwrap_or_default(),
            email: order.email.as_deref().unwrap_or_default(),
            status: status_label(order.status),
            cost: order
                .estimated_cost
                .map(|c| format!("{:.2}", c))
                .unwrap_or_default(),
            technical_note: order.technical_note.as_deref().unwrap_or_default(),
            accessories: order.accessories.as_deref().unwrap_or_default(),
            intake_date: format_date(Some(order.intake_date)),
            repaired_date: format_date(order.repaired_date),
            pickup_date: format_date(order.pickup_date),
        }
    }
}

/// Human-readable status for spreadsheet cells
pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Repaired => "Repaired",
        OrderStatus::PickedUp => "Picked up",
    }
}

/// `DD/MM/YYYY`, or an empty string
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `repair_orders_YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("repair_orders_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `orders` as CSV, header row first
///
/// Orders are written in the given order.
pub fn write_orders_csv<W: Write>(writer: W, orders: &[RepairOrder]) -> RepairResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for order in orders {
        csv.serialize(ExportRow::from(order)).map_err(export_error)?;
    }
    if orders.is_empty() {
        csv.write_record([
            "ID",
            "Client",
            "Device",
            "Phone",
            "Email",
            "Status",
            "Cost",
            "Technical Note",
            "Accessories",
            "Intake Date",
            "Repaired Date",
            "Pickup Date",
        ])
        .map_err(export_error)?;
    }
    csv.flush()
        .map_err(|e| RepairError::Internal(format!("export failed: {}", e)))?;
    Ok(())
}

/// Export into `dir`, named after `date`; returns the written path
pub fn export_to_dir(
    dir: &Path,
    date: NaiveDate,
    orders: &[RepairOrder],
) -> RepairResult<std::path::PathBuf> {
    let path = dir.join(export_file_name(date));
    let file = std::fs::File::create(&path)
        .map_err(|e| RepairError::Internal(format!("cannot create {}: {}", path.display(), e)))?;
    write_orders_csv(std::io::BufWriter::new(file), orders)?;
    tracing::info!(path = %path.display(), rows = orders.len(), "orders exported");
    Ok(path)
}

fn export_error(err: csv::Error) -> RepairError {
    RepairError::Internal(format!("export failed: {}", err))
}
