use std::fmt;
use std::io::{self, Stdout, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{Category, IntegrityReport, Kilograms, build_integrity_report};
use crate::storage::{LedgerStore, SaleCommit};

use super::{AppError, CategoryStatus, InventoryReport, Rejection, SalesReport};

/// What a restock or sale did. Every event is also written to the shop's
/// output as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    Restocked {
        category: Category,
        amount: Kilograms,
        quantity: Kilograms,
    },
    Sold {
        category: Category,
        amount: Kilograms,
        quantity: Kilograms,
        total_sold: Kilograms,
    },
    Rejected(Rejection),
}

impl ShopEvent {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ShopEvent::Rejected(_))
    }
}

impl fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopEvent::Restocked {
                category,
                amount,
                quantity,
            } => write!(
                f,
                "{} kg of {} added to inventory (now {} kg)",
                amount, category, quantity
            ),
            ShopEvent::Sold {
                category,
                amount,
                quantity,
                total_sold,
            } => write!(
                f,
                "{} kg of {} is sold (inventory {} kg, total sales {} kg)",
                amount, category, quantity, total_sold
            ),
            ShopEvent::Rejected(rejection) => write!(f, "{}", rejection),
        }
    }
}

/// Shop operations over a ledger store.
///
/// Bad input never surfaces as an error: it is reported on the output and the
/// store is left alone. Only storage and output failures are returned.
pub struct Shop<W: Write = Stdout> {
    store: LedgerStore,
    out: W,
}

impl Shop<Stdout> {
    /// Open (or create) the ledger at `path`, reporting to stdout.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let store = LedgerStore::open(path).await?;
        Ok(Self::new(store, io::stdout()))
    }
}

impl<W: Write> Shop<W> {
    pub fn new(store: LedgerStore, out: W) -> Self {
        Self { store, out }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Add `amount` to the stock of `category`.
    pub async fn add_inventory(
        &mut self,
        category: &str,
        amount: Kilograms,
    ) -> Result<ShopEvent, AppError> {
        let category = match validate(category, amount) {
            Ok(category) => category,
            Err(rejection) => return self.reject("restock", rejection),
        };

        let current = self.store.get_inventory(category).await?;
        if current.quantity.checked_add(amount).is_none() {
            return self.reject(
                "restock",
                Rejection::QuantityTooLarge {
                    category,
                    current: current.quantity,
                    requested: amount,
                },
            );
        }

        let record = self.store.apply_inventory_delta(category, amount).await?;
        info!(category = %category, amount, quantity = record.quantity, "Restocked");

        self.emit(ShopEvent::Restocked {
            category,
            amount,
            quantity: record.quantity,
        })
    }

    /// Sell `amount` of `category`, provided there is enough in stock.
    ///
    /// The stock decrement and the sales increment are committed together.
    pub async fn sell(&mut self, category: &str, amount: Kilograms) -> Result<ShopEvent, AppError> {
        let category = match validate(category, amount) {
            Ok(category) => category,
            Err(rejection) => return self.reject("sale", rejection),
        };

        let current = self.store.get_inventory(category).await?;
        if !current.has_stock_for(amount) {
            return self.reject(
                "sale",
                Rejection::InsufficientStock {
                    category,
                    available: current.quantity,
                    requested: amount,
                },
            );
        }

        match self.store.commit_sale(category, amount).await? {
            SaleCommit::Committed { inventory, sales } => {
                info!(
                    category = %category,
                    amount,
                    quantity = inventory.quantity,
                    total_sold = sales.total_sold,
                    "Sold"
                );
                self.emit(ShopEvent::Sold {
                    category,
                    amount,
                    quantity: inventory.quantity,
                    total_sold: sales.total_sold,
                })
            }
            SaleCommit::InsufficientStock { available } => self.reject(
                "sale",
                Rejection::InsufficientStock {
                    category,
                    available,
                    requested: amount,
                },
            ),
            SaleCommit::TotalTooLarge { total_sold } => self.reject(
                "sale",
                Rejection::SalesTotalTooLarge {
                    category,
                    total_sold,
                    requested: amount,
                },
            ),
        }
    }

    pub async fn inventory_report(&self) -> Result<InventoryReport, AppError> {
        Ok(InventoryReport::new(self.store.list_inventory().await?))
    }

    pub async fn sales_report(&self) -> Result<SalesReport, AppError> {
        Ok(SalesReport::new(self.store.list_sales().await?))
    }

    /// Write the inventory report to the output, one line per category.
    pub async fn print_inventory_report(&mut self) -> Result<InventoryReport, AppError> {
        let report = self.inventory_report().await?;
        self.write_lines(&report.lines())?;
        Ok(report)
    }

    /// Write the sales report to the output, one line per category.
    pub async fn print_sales_report(&mut self) -> Result<SalesReport, AppError> {
        let report = self.sales_report().await?;
        self.write_lines(&report.lines())?;
        Ok(report)
    }

    pub async fn category_status(&self, category: Category) -> Result<CategoryStatus, AppError> {
        Ok(CategoryStatus {
            category,
            quantity: self.store.get_inventory_quantity(category).await?,
            total_sold: self.store.get_total_sold(category).await?,
        })
    }

    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let stats = self.store.integrity_stats().await?;
        Ok(build_integrity_report(stats))
    }

    fn reject(&mut self, operation: &str, rejection: Rejection) -> Result<ShopEvent, AppError> {
        warn!(operation, reason = %rejection, "Rejected");
        self.emit(ShopEvent::Rejected(rejection))
    }

    fn emit(&mut self, event: ShopEvent) -> Result<ShopEvent, AppError> {
        writeln!(self.out, "{}", event)?;
        Ok(event)
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<(), AppError> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}

/// Category must be one of the known varieties, amount strictly positive.
fn validate(category: &str, amount: Kilograms) -> Result<Category, Rejection> {
    let category: Category = category
        .parse()
        .map_err(|_| Rejection::InvalidCategory(category.to_string()))?;
    if amount <= 0 {
        return Err(Rejection::NonPositiveAmount(amount));
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_checks_category_before_amount() {
        assert_eq!(
            validate("mocha", 0),
            Err(Rejection::InvalidCategory("mocha".into()))
        );
        assert_eq!(
            validate("arabica", 0),
            Err(Rejection::NonPositiveAmount(0))
        );
        assert_eq!(
            validate("arabica", -5),
            Err(Rejection::NonPositiveAmount(-5))
        );
        assert_eq!(validate("liberica", 1), Ok(Category::Liberica));
    }

    #[test]
    fn test_event_lines() {
        let restocked = ShopEvent::Restocked {
            category: Category::Arabica,
            amount: 15,
            quantity: 15,
        };
        assert_eq!(
            restocked.to_string(),
            "15 kg of arabica added to inventory (now 15 kg)"
        );

        let sold = ShopEvent::Sold {
            category: Category::Arabica,
            amount: 2,
            quantity: 13,
            total_sold: 2,
        };
        assert_eq!(
            sold.to_string(),
            "2 kg of arabica is sold (inventory 13 kg, total sales 2 kg)"
        );
        assert!(!sold.is_rejected());

        let rejected = ShopEvent::Rejected(Rejection::NonPositiveAmount(0));
        assert_eq!(rejected.to_string(), "Amount must be positive");
        assert!(rejected.is_rejected());
    }
}
