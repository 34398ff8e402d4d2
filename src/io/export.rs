use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{InventoryRecord, SalesRecord};
use crate::storage::LedgerStore;

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub inventory: Vec<InventoryRecord>,
    pub sales: Vec<SalesRecord>,
}

/// Exporter for writing ledger tables to CSV or JSON
pub struct Exporter<'a> {
    store: &'a LedgerStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Export inventory to CSV format
    pub async fn export_inventory_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.store.list_inventory().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["category", "quantity"])?;
        for record in &records {
            csv_writer.write_record([
                record.category.as_str(),
                record.quantity.to_string().as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export sales totals to CSV format
    pub async fn export_sales_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.store.list_sales().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["category", "total_sold"])?;
        for record in &records {
            csv_writer.write_record([
                record.category.as_str(),
                record.total_sold.to_string().as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export both tables as a single JSON document
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            inventory: self.store.list_inventory().await?,
            sales: self.store.list_sales().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
