//! CSV export of analytics datasets

use serde::Serialize;
use std::io::Write;

use super::summary::category_shares;
use super::types::SalesDataset;

/// Which table of a dataset to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Monthly,
    Products,
    Weekly,
    Categories,
}

impl std::str::FromStr for ExportTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "revenue" => Ok(ExportTable::Monthly),
            "products" => Ok(ExportTable::Products),
            "weekly" | "orders" => Ok(ExportTable::Weekly),
            "categories" | "retailers" => Ok(ExportTable::Categories),
            _ => Err(format!(
                "Unknown table: {}. Use: monthly, products, weekly, categories",
                s
            )),
        }
    }
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write one table of `data` as CSV with a header row
pub fn export_csv<W: Write>(data: &SalesDataset, table: ExportTable, writer: W) -> Result<(), csv::Error> {
    match table {
        ExportTable::Monthly => write_rows(writer, &data.monthly),
        ExportTable::Products => write_rows(writer, &data.top_products),
        ExportTable::Weekly => write_rows(writer, &data.weekly_orders),
        ExportTable::Categories => write_rows(writer, &category_shares(&data.retailer_categories)),
    }
}
