//! Error types for the cart crate.

use atelier_core::{LineId, ProductId};
use chrono::NaiveDate;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by cart construction and mutation.
///
/// Validation errors reject the input before it reaches the store; a
/// [`CartError::Storage`] error means the in-memory mutation was applied
/// but the local snapshot may be stale.
#[derive(Debug, Error)]
pub enum CartError {
    /// A stay must cover at least one night.
    #[error("check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// Room stays derive their length from the booked dates; there is no
    /// quantity to set. Re-book with different dates instead.
    #[error("line {line_id} is a room stay; change its dates, not a quantity")]
    QuantityImmutable {
        /// The room line the update targeted.
        line_id: LineId,
    },

    /// The catalog reports no remaining stock for the product.
    #[error("product {product_id} is out of stock")]
    OutOfStock {
        /// The product the add targeted.
        product_id: ProductId,
    },

    /// Writing or clearing the local cart snapshot failed.
    #[error("cart snapshot error: {0}")]
    Storage(#[from] StorageError),
}
