//! Order placement and cancellation
//!
//! Orders move stock: placing one takes its quantity out of the referenced
//! product, cancelling puts the same quantity back. Both directions use
//! checked arithmetic and validate everything before mutating the snapshot.

use crate::core::validators::{parse_positive_integer, phone_is_valid};
use crate::types::{EngineError, Order, OrderDetail, Snapshot};
use chrono::NaiveDateTime;

/// Place an order from raw input, returning the stored order
///
/// The order captures the product's current price as its unit price.
///
/// # Errors
///
/// Returns an error if:
/// - `order_id` is empty or already used
/// - `phone` is not exactly 11 digits
/// - `product_id` does not exist
/// - `quantity` is not an integer greater than 0
/// - `quantity` exceeds the product's stock
/// - The order total does not fit a decimal
pub fn place_order(
    snapshot: &mut Snapshot,
    order_id: &str,
    phone: &str,
    product_id: &str,
    quantity: &str,
    created_at: NaiveDateTime,
) -> Result<Order, EngineError> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(EngineError::missing_field("Order ID"));
    }

    if snapshot.order(order_id).is_some() {
        return Err(EngineError::duplicate_order(order_id));
    }

    if !phone_is_valid(phone) {
        return Err(EngineError::invalid_phone(phone));
    }

    let product_id = product_id.trim();
    let product = snapshot
        .product_mut(product_id)
        .ok_or_else(|| EngineError::product_not_found(product_id))?;

    let quantity =
        parse_positive_integer(quantity).ok_or_else(|| EngineError::invalid_quantity(quantity))?;

    let remaining = product
        .stock
        .checked_sub(quantity)
        .ok_or_else(|| EngineError::insufficient_stock(product_id, product.stock, quantity))?;

    let order = Order {
        id: order_id.to_string(),
        phone: phone.to_string(),
        product_id: product.id.clone(),
        quantity,
        unit_price: product.price,
        created_at,
    };
    if order.total().is_none() {
        return Err(EngineError::amount_overflow(product_id));
    }

    product.stock = remaining;
    snapshot.orders.push(order.clone());

    Ok(order)
}

/// Cancel an order, restoring its quantity to the product's stock
///
/// # Errors
///
/// Returns an error if:
/// - `order_id` does not exist
/// - The order's product no longer exists
/// - Restoring the stock would overflow
pub fn cancel_order(snapshot: &mut Snapshot, order_id: &str) -> Result<Order, EngineError> {
    let order_id = order_id.trim();
    let index = snapshot
        .orders
        .iter()
        .position(|order| order.id == order_id)
        .ok_or_else(|| EngineError::order_not_found(order_id))?;

    let (product_id, quantity) = {
        let order = &snapshot.orders[index];
        (order.product_id.clone(), order.quantity)
    };

    let product = snapshot
        .product_mut(&product_id)
        .ok_or_else(|| EngineError::order_product_missing(order_id, &product_id))?;

    product.stock = product
        .stock
        .checked_add(quantity)
        .ok_or_else(|| EngineError::stock_overflow(&product_id))?;

    Ok(snapshot.orders.remove(index))
}

/// Look up an order together with its product's name
pub fn order_detail(snapshot: &Snapshot, order_id: &str) -> Result<OrderDetail, EngineError> {
    let order_id = order_id.trim();
    let order = snapshot
        .order(order_id)
        .ok_or_else(|| EngineError::order_not_found(order_id))?;

    Ok(OrderDetail {
        order: order.clone(),
        product_name: snapshot
            .product(&order.product_id)
            .map(|product| product.name.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::types::ProductField;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;

    const PHONE: &str = "13800000000";

    fn created_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn with_widget() -> Snapshot {
        let mut snapshot = Snapshot::default();
        catalog::add_product(&mut snapshot, "P1", "Widget", "tools", "10.00", "5").unwrap();
        snapshot
    }

    #[test]
    fn test_place_order_takes_stock() {
        let mut snapshot = with_widget();

        let order = place_order(&mut snapshot, "O1", PHONE, "P1", "3", created_at()).unwrap();

        assert_eq!(order.quantity, 3);
        assert_eq!(order.unit_price, Decimal::new(1000, 2));
        assert_eq!(order.total(), Some(Decimal::new(3000, 2)));
        assert_eq!(snapshot.product("P1").unwrap().stock, 2);
        assert_eq!(snapshot.order("O1"), Some(&order));
    }

    #[test]
    fn test_place_order_for_entire_stock() {
        let mut snapshot = with_widget();

        place_order(&mut snapshot, "O1", PHONE, "P1", "5", created_at()).unwrap();

        assert_eq!(snapshot.product("P1").unwrap().stock, 0);
    }

    #[rstest]
    #[case::empty_id("", PHONE, "P1", "1", EngineError::missing_field("Order ID"))]
    #[case::bad_phone("O2", "12345", "P1", "1", EngineError::invalid_phone("12345"))]
    #[case::missing_product("O2", PHONE, "P9", "1", EngineError::product_not_found("P9"))]
    #[case::zero_quantity("O2", PHONE, "P1", "0", EngineError::invalid_quantity("0"))]
    #[case::text_quantity("O2", PHONE, "P1", "two", EngineError::invalid_quantity("two"))]
    #[case::over_stock("O2", PHONE, "P1", "6", EngineError::insufficient_stock("P1", 5, 6))]
    fn test_place_order_rejects(
        #[case] order_id: &str,
        #[case] phone: &str,
        #[case] product_id: &str,
        #[case] quantity: &str,
        #[case] expected: EngineError,
    ) {
        let mut snapshot = with_widget();
        let before = snapshot.clone();

        let result = place_order(&mut snapshot, order_id, phone, product_id, quantity, created_at());

        assert_eq!(result, Err(expected));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_place_order_rejects_overflowing_total() {
        let mut snapshot = with_widget();
        snapshot.product_mut("P1").unwrap().price = Decimal::MAX;
        let before = snapshot.clone();

        let result = place_order(&mut snapshot, "O1", PHONE, "P1", "2", created_at());

        assert_eq!(result, Err(EngineError::amount_overflow("P1")));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_identifiers_are_trimmed() {
        let mut snapshot = with_widget();

        let order = place_order(&mut snapshot, " O1 ", PHONE, " P1 ", "2", created_at()).unwrap();
        assert_eq!(order.id, "O1");
        assert_eq!(order.product_id, "P1");

        assert_eq!(order_detail(&snapshot, "O1 ").unwrap().order, order);
        assert_eq!(cancel_order(&mut snapshot, " O1").unwrap(), order);
        assert_eq!(snapshot.product("P1").unwrap().stock, 5);
    }

    #[test]
    fn test_place_order_rejects_duplicate_id() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "1", created_at()).unwrap();

        let result = place_order(&mut snapshot, "O1", PHONE, "P1", "1", created_at());

        assert_eq!(result, Err(EngineError::duplicate_order("O1")));
        assert_eq!(snapshot.product("P1").unwrap().stock, 4);
    }

    #[test]
    fn test_unit_price_frozen_after_price_change() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "2", created_at()).unwrap();

        catalog::modify_product(&mut snapshot, "P1", ProductField::Price, "99.99").unwrap();

        let order = snapshot.order("O1").unwrap();
        assert_eq!(order.unit_price, Decimal::new(1000, 2));
        assert_eq!(order.total(), Some(Decimal::new(2000, 2)));
    }

    #[test]
    fn test_cancel_order_restores_stock() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "3", created_at()).unwrap();

        let cancelled = cancel_order(&mut snapshot, "O1").unwrap();

        assert_eq!(cancelled.id, "O1");
        assert_eq!(snapshot.product("P1").unwrap().stock, 5);
        assert!(snapshot.order("O1").is_none());
    }

    #[test]
    fn test_cancel_missing_order() {
        let mut snapshot = with_widget();
        let before = snapshot.clone();

        let result = cancel_order(&mut snapshot, "O9");

        assert_eq!(result, Err(EngineError::order_not_found("O9")));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_cancel_order_with_deleted_product() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "3", created_at()).unwrap();
        catalog::remove_product(&mut snapshot, "P1").unwrap();

        let result = cancel_order(&mut snapshot, "O1");

        assert_eq!(result, Err(EngineError::order_product_missing("O1", "P1")));
        assert!(snapshot.order("O1").is_some());
    }

    #[test]
    fn test_cancel_order_stock_overflow() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "3", created_at()).unwrap();
        snapshot.product_mut("P1").unwrap().stock = u32::MAX;

        let result = cancel_order(&mut snapshot, "O1");

        assert_eq!(result, Err(EngineError::stock_overflow("P1")));
        assert!(snapshot.order("O1").is_some());
    }

    #[test]
    fn test_order_detail_with_dangling_product() {
        let mut snapshot = with_widget();
        place_order(&mut snapshot, "O1", PHONE, "P1", "1", created_at()).unwrap();
        catalog::remove_product(&mut snapshot, "P1").unwrap();

        let detail = order_detail(&snapshot, "O1").unwrap();

        assert_eq!(detail.product_name, None);
        assert_eq!(detail.product_label(), "unknown product");
    }
}
