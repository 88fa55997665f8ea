//! Order statistics
//!
//! Read-only aggregation of orders by the category of the product they
//! reference. Orders whose product has been deleted have no category and are
//! totalled separately.

use crate::types::{EngineError, Snapshot};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Quantity and amount summed over a group of orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub quantity: u64,
    pub amount: Decimal,
}

impl CategoryTotals {
    /// Add one order's quantity and total, `None` on overflow
    fn checked_add(self, quantity: u64, amount: Decimal) -> Option<Self> {
        Some(CategoryTotals {
            quantity: self.quantity.checked_add(quantity)?,
            amount: self.amount.checked_add(amount)?,
        })
    }
}

/// Order totals grouped by product category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStatistics {
    /// Per category, sorted by category name
    pub categories: BTreeMap<String, CategoryTotals>,

    /// Orders referencing a product that no longer exists
    pub unknown_product: CategoryTotals,

    /// Sum over every order, including those with an unknown product
    pub total: CategoryTotals,
}

impl OrderStatistics {
    /// Aggregate every order in `snapshot`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmountOverflow`] if an order total, or a sum of
    /// totals, does not fit a decimal.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, EngineError> {
        let mut statistics = OrderStatistics::default();

        for order in &snapshot.orders {
            let overflow = || EngineError::amount_overflow(&order.product_id);
            let amount = order.total().ok_or_else(overflow)?;
            let quantity = u64::from(order.quantity);

            let totals = match snapshot.product(&order.product_id) {
                Some(product) => statistics
                    .categories
                    .entry(product.category.clone())
                    .or_default(),
                None => &mut statistics.unknown_product,
            };
            *totals = totals.checked_add(quantity, amount).ok_or_else(overflow)?;
            statistics.total = statistics
                .total
                .checked_add(quantity, amount)
                .ok_or_else(overflow)?;
        }

        Ok(statistics)
    }

    pub fn is_empty(&self) -> bool {
        self.total.quantity == 0
    }
}
