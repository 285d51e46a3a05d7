//! Value Objects for the canteen domain

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reason given by staff when an order is cancelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReason(String);

impl CancelReason {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValueError> {
        let value = value.as_ref().trim();
        if value.is_empty() { return Err(ValueError::BlankReason); }
        Ok(Self(value.to_string()))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Unit price of a line item or menu item. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> Result<Self, ValueError> {
        if amount.is_sign_negative() && !amount.is_zero() { return Err(ValueError::NegativePrice(amount)); }
        Ok(Self(amount))
    }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn times(&self, qty: Quantity) -> Decimal { self.0 * Decimal::from(qty.value()) }
}

impl TryFrom<Decimal> for Price {
    type Error = ValueError;
    fn try_from(value: Decimal) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self { price.0 }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.normalize()) }
}

/// Number of units on a line item. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, ValueError> {
        if value == 0 { return Err(ValueError::ZeroQuantity); }
        Ok(Self(value))
    }
    pub fn value(&self) -> u32 { self.0 }
}

impl TryFrom<u32> for Quantity {
    type Error = ValueError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self { qty.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("reason must not be blank")]
    BlankReason,
    #[error("price must not be negative: {0}")]
    NegativePrice(Decimal),
    #[error("quantity must be positive")]
    ZeroQuantity,
}
