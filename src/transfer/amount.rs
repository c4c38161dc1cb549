//! Decimal amount to smallest-unit scaling.
//!
//! Amounts are kept as decimal strings until they are scaled, so no
//! floating-point value ever participates in the on-chain amount.

use alloy::primitives::utils::parse_units;
use alloy::primitives::U256;
use thiserror::Error;

/// Reasons an amount string cannot be used for a transfer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("amount must be greater than zero")]
    Zero,

    #[error("'{amount}' has more than {decimals} fractional digits")]
    TooPrecise { amount: String, decimals: u8 },

    #[error("'{0}' is not a decimal number")]
    Malformed(String),
}

/// Scale a human-readable decimal amount by `10^decimals`.
pub fn to_smallest_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative);
    }
    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(AmountError::TooPrecise {
                amount: amount.to_string(),
                decimals,
            });
        }
    }

    let units = parse_units(amount, decimals)
        .map_err(|_| AmountError::Malformed(amount.to_string()))?
        .get_absolute();
    if units.is_zero() {
        return Err(AmountError::Zero);
    }
    Ok(units)
}
