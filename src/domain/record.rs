use serde::{Deserialize, Serialize};

use super::{Category, Kilograms};

/// Stock on hand for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub category: Category,
    pub quantity: Kilograms,
}

impl InventoryRecord {
    /// The record a category has before it is first touched.
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            quantity: 0,
        }
    }

    pub fn has_stock_for(&self, amount: Kilograms) -> bool {
        self.quantity >= amount
    }
}

/// Cumulative units sold for one category. Only ever incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub category: Category,
    pub total_sold: Kilograms,
}

impl SalesRecord {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            total_sold: 0,
        }
    }
}
