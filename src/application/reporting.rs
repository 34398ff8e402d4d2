use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, InventoryRecord, Kilograms, SalesRecord, format_kg};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<InventoryRecord>,
    /// Widened so the sum of per-category counters cannot overflow.
    pub total: i128,
}

impl InventoryReport {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        let total = records.iter().map(|r| i128::from(r.quantity)).sum();
        Self {
            generated_at: Utc::now(),
            records,
            total,
        }
    }

    /// Header followed by one line per category.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once("Current inventory:".to_string())
            .chain(
                self.records
                    .iter()
                    .map(|r| format!("{}: {}", r.category, format_kg(r.quantity))),
            )
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<SalesRecord>,
    pub total: i128,
}

impl SalesReport {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        let total = records.iter().map(|r| i128::from(r.total_sold)).sum();
        Self {
            generated_at: Utc::now(),
            records,
            total,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        std::iter::once("Sales data:".to_string())
            .chain(
                self.records
                    .iter()
                    .map(|r| format!("{}: {}", r.category, format_kg(r.total_sold))),
            )
            .collect()
    }
}

/// Both counters for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub quantity: Kilograms,
    pub total_sold: Kilograms,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_report_lines_and_total() {
        let report = InventoryReport::new(vec![
            InventoryRecord {
                category: Category::Arabica,
                quantity: 13,
            },
            InventoryRecord {
                category: Category::Robusta,
                quantity: 5,
            },
        ]);
        assert_eq!(report.total, 18);
        assert_eq!(
            report.lines(),
            vec!["Current inventory:", "arabica: 13 kg", "robusta: 5 kg"]
        );
    }

    #[test]
    fn test_report_total_exceeds_single_counter() {
        let report = InventoryReport::new(vec![
            InventoryRecord {
                category: Category::Arabica,
                quantity: i64::MAX,
            },
            InventoryRecord {
                category: Category::Robusta,
                quantity: 1,
            },
        ]);
        assert_eq!(report.total, i128::from(i64::MAX) + 1);
        assert_eq!(
            report.lines(),
            vec![
                "Current inventory:".to_string(),
                format!("arabica: {} kg", i64::MAX),
                "robusta: 1 kg".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_sales_report_has_only_header() {
        let report = SalesReport::new(Vec::new());
        assert_eq!(report.total, 0);
        assert_eq!(report.lines(), vec!["Sales data:"]);
    }
}
