mod store;

pub use store::*;

/// SQL migration for the inventory and sales tables
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
