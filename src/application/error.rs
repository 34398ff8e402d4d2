use thiserror::Error;

use crate::domain::{Category, Kilograms};

/// Failures that abort a shop operation and reach the caller.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Why a restock or sale was refused. Rejections are reported to the shop's
/// output and leave both tables untouched; they are never returned as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{0} is not a valid coffee type")]
    InvalidCategory(String),

    #[error("Amount must be positive")]
    NonPositiveAmount(Kilograms),

    #[error(
        "{category} is not in stock: not enough inventory (have {available} kg, requested {requested} kg)"
    )]
    InsufficientStock {
        category: Category,
        available: Kilograms,
        requested: Kilograms,
    },

    #[error(
        "{requested} kg of {category} would exceed the largest recordable stock (now {current} kg)"
    )]
    QuantityTooLarge {
        category: Category,
        current: Kilograms,
        requested: Kilograms,
    },

    #[error(
        "{requested} kg of {category} would exceed the largest recordable sales total (now {total_sold} kg)"
    )]
    SalesTotalTooLarge {
        category: Category,
        total_sold: Kilograms,
        requested: Kilograms,
    },
}
