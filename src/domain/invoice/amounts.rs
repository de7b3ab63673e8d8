//! Monetary amounts printed on an e-invoice.
//!
//! All amounts are whole currency units (VND has no minor unit). Both the
//! price and the tax are rounded half away from zero, so a given order price
//! always yields the same invoice totals.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::foundation::ValidationError;

/// VAT percentage applied to every invoice line.
pub const TAX_PERCENTAGE: u32 = 10;

/// Rounding rule for every invoice amount.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Price, tax and total of a single-line invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceAmounts {
    /// Price before tax.
    pub price: i64,
    pub tax: i64,
    /// `price + tax`.
    pub total: i64,
}

impl InvoiceAmounts {
    /// Computes `price = round(raw)`, `tax = round(price * 10%)`, `total = price + tax`.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for negative prices or amounts that do not fit in `i64`.
    pub fn from_price(raw_price: Decimal) -> Result<Self, ValidationError> {
        if raw_price.is_sign_negative() && !raw_price.is_zero() {
            return Err(ValidationError::invalid_format(
                "price",
                format!("negative price {}", raw_price),
            ));
        }

        let price = round_whole(raw_price)?;
        let tax = round_whole(Decimal::from(price) * tax_rate())?;
        let total = price.checked_add(tax).ok_or_else(|| {
            ValidationError::invalid_format("price", "invoice total overflows")
        })?;

        Ok(Self { price, tax, total })
    }
}

fn tax_rate() -> Decimal {
    Decimal::new(i64::from(TAX_PERCENTAGE), 2)
}

fn round_whole(value: Decimal) -> Result<i64, ValidationError> {
    value
        .round_dp_with_strategy(0, ROUNDING)
        .to_i64()
        .ok_or_else(|| ValidationError::invalid_format("price", format!("{} out of range", value)))
}
