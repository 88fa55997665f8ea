//! Product-related types for the inventory engine
//!
//! This module defines the Product entity, the closed set of editable product
//! fields, and the money rounding rule shared by every derived total.

use crate::types::error::EngineError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Product identifier (immutable once created)
pub type ProductId = String;

/// Round a money amount to 2 decimal places
///
/// Midpoints round away from zero, so `0.125` becomes `0.13`.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest accepted unit price, in whole currency units
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Most significant digits a price may carry
///
/// Prices are stored as JSON numbers; up to 15 significant digits read back
/// exactly.
pub const MAX_PRICE_DIGITS: u32 = 15;

/// True iff `price` is within [`MAX_PRICE`] and has at most
/// [`MAX_PRICE_DIGITS`] significant digits
pub fn price_in_range(price: Decimal) -> bool {
    let digits = price
        .normalize()
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |exponent| exponent + 1);
    price <= Decimal::from(MAX_PRICE) && digits <= MAX_PRICE_DIGITS
}

/// A product held in stock
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Free-text category used for order statistics
    pub category: String,

    /// Current unit price (always > 0)
    pub price: Decimal,

    /// Units in stock (never negative)
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            stock,
        }
    }

    /// Value of the stock on hand: price × stock, rounded to 2 decimals
    ///
    /// `None` if the product does not fit a decimal.
    pub fn total_value(&self) -> Option<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.stock))
            .map(round_money)
    }
}

/// Editable product fields
///
/// The identifier is deliberately absent: product identifiers never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Category,
    Price,
    Stock,
}

impl ProductField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Category => "category",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(ProductField::Name),
            "category" => Ok(ProductField::Category),
            "price" => Ok(ProductField::Price),
            "stock" => Ok(ProductField::Stock),
            _ => Err(EngineError::unknown_field(s)),
        }
    }
}

/// A validated edit to a single product field
///
/// Produced by the engine after parsing the raw input for a [`ProductField`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProductEdit {
    Name(String),
    Category(String),
    Price(Decimal),
    Stock(u32),
}

impl ProductEdit {
    pub fn field(&self) -> ProductField {
        match self {
            ProductEdit::Name(_) => ProductField::Name,
            ProductEdit::Category(_) => ProductField::Category,
            ProductEdit::Price(_) => ProductField::Price,
            ProductEdit::Stock(_) => ProductField::Stock,
        }
    }

    /// Apply the edit to a product
    pub fn apply(self, product: &mut Product) {
        match self {
            ProductEdit::Name(name) => product.name = name,
            ProductEdit::Category(category) => product.category = category,
            ProductEdit::Price(price) => product.price = price,
            ProductEdit::Stock(stock) => product.stock = stock,
        }
    }
}
