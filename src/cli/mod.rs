use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::Shop;
use crate::domain::{Category, format_kg};
use crate::io::Exporter;

/// Beanledger - coffee stock and sales ledger
#[derive(Parser)]
#[command(name = "beanledger")]
#[command(about = "Track coffee stock on hand and cumulative sales in a local SQLite ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "beanledger.db")]
    pub database: String,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Add stock for a coffee type
    Restock {
        /// Coffee type: arabica, liberica, robusta
        category: String,

        /// Kilograms to add
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },

    /// Sell from stock
    Sell {
        /// Coffee type: arabica, liberica, robusta
        category: String,

        /// Kilograms sold
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },

    /// Show stock on hand for every coffee type
    Inventory {
        /// Output format: text, json, csv
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show cumulative sales for every coffee type
    Sales {
        /// Output format: text, json, csv
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show stock and sales for one coffee type
    Show {
        /// Coffee type
        category: String,
    },

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: inventory, sales, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Seed a sample ledger and print both reports
    Demo,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,beanledger=debug"
        } else {
            "warn"
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut shop = Shop::open(&self.database).await?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Restock { category, amount } => {
                shop.add_inventory(&category, amount).await?;
            }

            Commands::Sell { category, amount } => {
                shop.sell(&category, amount).await?;
            }

            Commands::Inventory { format } => match format.as_str() {
                "json" => {
                    let report = shop.inventory_report().await?;
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    Exporter::new(shop.store())
                        .export_inventory_csv(std::io::stdout())
                        .await?;
                }
                _ => {
                    shop.print_inventory_report().await?;
                }
            },

            Commands::Sales { format } => match format.as_str() {
                "json" => {
                    let report = shop.sales_report().await?;
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    Exporter::new(shop.store())
                        .export_sales_csv(std::io::stdout())
                        .await?;
                }
                _ => {
                    shop.print_sales_report().await?;
                }
            },

            Commands::Show { category } => {
                let category: Category = category.parse()?;
                let status = shop.category_status(category).await?;

                println!("Coffee: {}", status.category);
                println!("  In stock:   {}", format_kg(status.quantity));
                println!("  Total sold: {}", format_kg(status.total_sold));
            }

            Commands::Check => {
                run_check_command(&shop).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                run_export_command(&shop, &export_type, output.as_deref()).await?;
            }

            Commands::Demo => {
                run_demo_command(&mut shop).await?;
            }
        }

        Ok(())
    }
}

async fn run_check_command(shop: &Shop) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = shop.check_integrity().await?;

    println!("Inventory rows: {}", report.inventory_count);
    println!("Sales rows:     {}", report.sales_count);
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}

async fn run_export_command(shop: &Shop, export_type: &str, output: Option<&str>) -> Result<()> {
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(shop.store());

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "inventory" => {
            let count = exporter.export_inventory_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} inventory rows", count);
            }
        }
        "sales" => {
            let count = exporter.export_sales_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} sales rows", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported {} inventory rows and {} sales rows",
                    snapshot.inventory.len(),
                    snapshot.sales.len()
                );
            }
        }
        other => {
            anyhow::bail!(
                "Unknown export type '{}'. Valid types: inventory, sales, full",
                other
            );
        }
    }

    Ok(())
}

async fn run_demo_command(shop: &mut Shop) -> Result<()> {
    for (category, amount) in [("arabica", 15), ("robusta", 10), ("liberica", 20)] {
        shop.add_inventory(category, amount).await?;
    }

    for (category, amount) in [("arabica", 2), ("robusta", 5), ("liberica", 10)] {
        shop.sell(category, amount).await?;
    }

    shop.print_inventory_report().await?;
    shop.print_sales_report().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amounts_reach_validation() {
        let cli = Cli::try_parse_from(["beanledger", "sell", "arabica", "-3"]).unwrap();
        match cli.command {
            Commands::Sell { category, amount } => {
                assert_eq!(category, "arabica");
                assert_eq!(amount, -3);
            }
            _ => panic!("expected sell command"),
        }
    }

    #[test]
    fn test_default_log_filter() {
        let cli = Cli::try_parse_from(["beanledger", "check"]).unwrap();
        assert_eq!(cli.default_log_filter(), "warn");

        let cli = Cli::try_parse_from(["beanledger", "-v", "check"]).unwrap();
        assert_eq!(cli.default_log_filter(), "warn,beanledger=debug");
    }

    #[test]
    fn test_database_defaults_and_override() {
        let cli = Cli::try_parse_from(["beanledger", "inventory"]).unwrap();
        assert_eq!(cli.database, "beanledger.db");

        let cli = Cli::try_parse_from(["beanledger", "-d", "shop.db", "check", "-v"]).unwrap();
        assert_eq!(cli.database, "shop.db");
        assert!(cli.verbose);
    }
}
