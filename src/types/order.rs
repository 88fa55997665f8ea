//! Order-related types for the inventory engine

use crate::types::product::{round_money, ProductId};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Order identifier (immutable once created)
pub type OrderId = String;

/// Format used for order timestamps, both on disk and for display
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A purchase order recorded against a product's stock
///
/// The unit price is captured when the order is placed and never follows
/// later changes to the product's price.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,

    /// Buyer phone number (11 digits)
    pub phone: String,

    /// Referenced product; may dangle if the product was deleted later
    pub product_id: ProductId,

    /// Units purchased (always > 0)
    pub quantity: u32,

    /// Unit price at the time the order was placed
    pub unit_price: Decimal,

    /// Local creation time, second precision
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Order total: unit price × quantity, rounded to 2 decimals
    ///
    /// `None` if the total does not fit a decimal.
    pub fn total(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .map(round_money)
    }
}

/// Order as presented to an operator, with the referenced product resolved
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub order: Order,

    /// Name of the referenced product, `None` when it no longer exists
    pub product_name: Option<String>,
}

impl OrderDetail {
    /// Product name, or "unknown product" for a dangling reference
    pub fn product_label(&self) -> &str {
        self.product_name.as_deref().unwrap_or("unknown product")
    }
}
