use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::domain::{Category, IntegrityStats, InventoryRecord, Kilograms, SalesRecord};

use super::MIGRATION_001_INITIAL;

/// How long a write waits for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of [`LedgerStore::commit_sale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleCommit {
    Committed {
        inventory: InventoryRecord,
        sales: SalesRecord,
    },
    /// Stock on hand is below the requested amount.
    InsufficientStock { available: Kilograms },
    /// The sales total cannot grow by the requested amount.
    TotalTooLarge { total_sold: Kilograms },
}

/// Persisted stock and sales counters, one row per category in each table.
///
/// The pool holds a single connection, so every call runs against one
/// serialized writer and no further locking is needed.
pub struct LedgerStore {
    pool: SqlitePool,
}

impl LedgerStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database file at `path`, creating it and its tables if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening ledger database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let store = Self::connect_with(options).await?;
        store.ensure_initialized().await?;
        Ok(store)
    }

    /// Connect to a database URL such as `sqlite:ledger.db`.
    /// Does not create the file or the tables.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .busy_timeout(BUSY_TIMEOUT);
        Self::connect_with(options).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the inventory and sales tables if they are missing.
    pub async fn ensure_initialized(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        debug!("Ledger schema ready");
        Ok(())
    }

    /// The underlying pool, for queries the store does not cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ========================
    // Inventory operations
    // ========================

    /// Add `delta` (possibly negative) to the stock of `category`, creating
    /// the row at zero first if it does not exist.
    ///
    /// Non-negativity is the caller's responsibility. A delta that would
    /// overflow the stored integer fails the column check and is an error.
    pub async fn apply_inventory_delta(
        &self,
        category: Category,
        delta: Kilograms,
    ) -> Result<InventoryRecord> {
        debug!(category = %category, delta, "Applying inventory delta");
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::add_to_inventory(&mut conn, category, delta).await
    }

    /// Current stock for `category`. A category never recorded has an empty
    /// record; nothing is persisted by reading it.
    pub async fn get_inventory(&self, category: Category) -> Result<InventoryRecord> {
        let row = sqlx::query("SELECT category, quantity FROM inventory WHERE category = ?")
            .bind(category.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch inventory")?;

        match row {
            Some(row) => Self::row_to_inventory(&row),
            None => Ok(InventoryRecord::empty(category)),
        }
    }

    pub async fn get_inventory_quantity(&self, category: Category) -> Result<Kilograms> {
        Ok(self.get_inventory(category).await?.quantity)
    }

    /// All inventory rows, ordered by category name.
    pub async fn list_inventory(&self) -> Result<Vec<InventoryRecord>> {
        let rows = sqlx::query("SELECT category, quantity FROM inventory ORDER BY category ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list inventory")?;

        rows.iter().map(Self::row_to_inventory).collect()
    }

    // ========================
    // Sales operations
    // ========================

    /// Add `amount` to the cumulative sales of `category`, creating the row
    /// at zero first if it does not exist.
    pub async fn record_sale(&self, category: Category, amount: Kilograms) -> Result<SalesRecord> {
        debug!(category = %category, amount, "Recording sale");
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::add_to_sales(&mut conn, category, amount).await
    }

    pub async fn get_sales(&self, category: Category) -> Result<SalesRecord> {
        let row = sqlx::query("SELECT category, amount FROM sales WHERE category = ?")
            .bind(category.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch sales")?;

        match row {
            Some(row) => Self::row_to_sales(&row),
            None => Ok(SalesRecord::empty(category)),
        }
    }

    pub async fn get_total_sold(&self, category: Category) -> Result<Kilograms> {
        Ok(self.get_sales(category).await?.total_sold)
    }

    /// All sales rows, ordered by category name.
    pub async fn list_sales(&self) -> Result<Vec<SalesRecord>> {
        let rows = sqlx::query("SELECT category, amount FROM sales ORDER BY category ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list sales")?;

        rows.iter().map(Self::row_to_sales).collect()
    }

    /// Take `amount` out of stock and add it to the sales total in a single
    /// transaction.
    ///
    /// Neither table is touched unless the whole sale can be recorded.
    pub async fn commit_sale(&self, category: Category, amount: Kilograms) -> Result<SaleCommit> {
        debug!(category = %category, amount, "Committing sale");
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin sale transaction")?;

        let row = sqlx::query("SELECT category, quantity FROM inventory WHERE category = ?")
            .bind(category.as_str())
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch inventory")?;
        let inventory = match row {
            Some(row) => Self::row_to_inventory(&row)?,
            None => InventoryRecord::empty(category),
        };

        let row = sqlx::query("SELECT category, amount FROM sales WHERE category = ?")
            .bind(category.as_str())
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch sales")?;
        let sales = match row {
            Some(row) => Self::row_to_sales(&row)?,
            None => SalesRecord::empty(category),
        };

        let outcome = if !inventory.has_stock_for(amount) {
            SaleCommit::InsufficientStock {
                available: inventory.quantity,
            }
        } else if sales.total_sold.checked_add(amount).is_none() {
            SaleCommit::TotalTooLarge {
                total_sold: sales.total_sold,
            }
        } else {
            let inventory = Self::add_to_inventory(&mut tx, category, -amount).await?;
            let sales = Self::add_to_sales(&mut tx, category, amount).await?;
            tx.commit()
                .await
                .context("Failed to commit sale transaction")?;
            return Ok(SaleCommit::Committed { inventory, sales });
        };

        tx.rollback()
            .await
            .context("Failed to roll back sale transaction")?;
        Ok(outcome)
    }

    // ========================
    // Integrity
    // ========================

    /// Gather the counts used by the integrity check. Unlike the list
    /// operations this tolerates rows whose category is not recognized.
    pub async fn integrity_stats(&self) -> Result<IntegrityStats> {
        let inventory_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM inventory")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count inventory rows")?
            .try_get("count")?;

        let sales_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM sales")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count sales rows")?
            .try_get("count")?;

        let negative_quantities = Self::fetch_categories(
            &self.pool,
            "SELECT category FROM inventory WHERE quantity < 0 ORDER BY category",
        )
        .await?;

        let negative_sales = Self::fetch_categories(
            &self.pool,
            "SELECT category FROM sales WHERE amount < 0 ORDER BY category",
        )
        .await?;

        let stored = Self::fetch_categories(
            &self.pool,
            "SELECT category FROM inventory UNION SELECT category FROM sales ORDER BY category",
        )
        .await?;
        let unknown_categories = stored
            .into_iter()
            .filter(|name| Category::from_str(name).is_err())
            .collect();

        Ok(IntegrityStats {
            inventory_count,
            sales_count,
            negative_quantities,
            negative_sales,
            unknown_categories,
        })
    }

    async fn fetch_categories(pool: &SqlitePool, query: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(query)
            .fetch_all(pool)
            .await
            .context("Failed to fetch categories")?;
        rows.iter()
            .map(|row| row.try_get("category").context("Invalid category column"))
            .collect()
    }

    async fn add_to_inventory(
        conn: &mut SqliteConnection,
        category: Category,
        delta: Kilograms,
    ) -> Result<InventoryRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO inventory (category, quantity)
            VALUES (?, ?)
            ON CONFLICT(category) DO UPDATE SET quantity = quantity + excluded.quantity
            RETURNING category, quantity
            "#,
        )
        .bind(category.as_str())
        .bind(delta)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to apply inventory delta")?;

        Self::row_to_inventory(&row)
    }

    async fn add_to_sales(
        conn: &mut SqliteConnection,
        category: Category,
        amount: Kilograms,
    ) -> Result<SalesRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO sales (category, amount)
            VALUES (?, ?)
            ON CONFLICT(category) DO UPDATE SET amount = amount + excluded.amount
            RETURNING category, amount
            "#,
        )
        .bind(category.as_str())
        .bind(amount)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to record sale")?;

        Self::row_to_sales(&row)
    }

    fn parse_category(row: &SqliteRow) -> Result<Category> {
        let name: String = row.try_get("category").context("Invalid category column")?;
        Category::from_str(&name).map_err(|_| anyhow::anyhow!("Invalid category: {}", name))
    }

    fn row_to_inventory(row: &SqliteRow) -> Result<InventoryRecord> {
        Ok(InventoryRecord {
            category: Self::parse_category(row)?,
            quantity: row
                .try_get("quantity")
                .context("Invalid quantity column")?,
        })
    }

    fn row_to_sales(row: &SqliteRow) -> Result<SalesRecord> {
        Ok(SalesRecord {
            category: Self::parse_category(row)?,
            total_sold: row.try_get("amount").context("Invalid amount column")?,
        })
    }
}
