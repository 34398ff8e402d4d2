// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use beanledger::application::Shop;
use beanledger::storage::LedgerStore;
use tempfile::TempDir;

/// Helper to create a store backed by a temporary database
pub async fn test_store() -> Result<(LedgerStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = LedgerStore::open(temp_dir.path().join("test.db")).await?;
    Ok((store, temp_dir))
}

/// Helper to create a shop that reports into an in-memory buffer
pub async fn test_shop() -> Result<(Shop<Vec<u8>>, TempDir)> {
    let (store, temp_dir) = test_store().await?;
    Ok((Shop::new(store, Vec::new()), temp_dir))
}

/// Everything the shop has reported so far, one entry per line
pub fn output_lines(shop: &Shop<Vec<u8>>) -> Vec<String> {
    String::from_utf8_lossy(shop.output())
        .lines()
        .map(str::to_string)
        .collect()
}
