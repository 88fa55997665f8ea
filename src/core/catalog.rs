//! Product catalog operations
//!
//! Validates raw product input and applies product changes to a snapshot.
//! Every function checks all of its preconditions before touching the
//! snapshot, so an `Err` always leaves it unchanged.

use crate::core::validators::{parse_positive_integer, parse_positive_real};
use crate::types::{price_in_range, EngineError, Product, ProductEdit, ProductField, Snapshot};
use rust_decimal::Decimal;

/// Add a new product from raw input
///
/// # Errors
///
/// Returns an error if:
/// - `id` is empty or already used by another product
/// - `name` or `category` is empty
/// - `price` is not a number greater than 0, or is out of range
/// - `stock` is not an integer greater than 0
/// - The value of the stock does not fit a decimal
pub fn add_product(
    snapshot: &mut Snapshot,
    id: &str,
    name: &str,
    category: &str,
    price: &str,
    stock: &str,
) -> Result<(), EngineError> {
    let id = non_empty(id, "Product ID")?;
    if snapshot.product(&id).is_some() {
        return Err(EngineError::duplicate_product(&id));
    }

    let name = non_empty(name, "Product name")?;
    let category = non_empty(category, "Category")?;
    let price = parse_price(price)?;
    let stock = parse_positive_integer(stock).ok_or_else(|| EngineError::invalid_stock(stock))?;

    let product = Product::new(id, name, category, price, stock);
    if product.total_value().is_none() {
        return Err(EngineError::amount_overflow(&product.id));
    }
    snapshot.products.push(product);

    Ok(())
}

/// Remove a product, returning it
///
/// Orders referencing the product are left in place; they become dangling
/// references that display as "unknown product".
pub fn remove_product(snapshot: &mut Snapshot, id: &str) -> Result<Product, EngineError> {
    let id = id.trim();
    let index = snapshot
        .products
        .iter()
        .position(|product| product.id == id)
        .ok_or_else(|| EngineError::product_not_found(id))?;

    Ok(snapshot.products.remove(index))
}

/// Parse the raw new value for `field`
///
/// Text fields must not be empty; numeric fields follow the same rules as
/// [`add_product`].
pub fn parse_edit(field: ProductField, value: &str) -> Result<ProductEdit, EngineError> {
    match field {
        ProductField::Name => non_empty(value, "Product name").map(ProductEdit::Name),
        ProductField::Category => non_empty(value, "Category").map(ProductEdit::Category),
        ProductField::Price => parse_price(value).map(ProductEdit::Price),
        ProductField::Stock => parse_positive_integer(value)
            .map(ProductEdit::Stock)
            .ok_or_else(|| EngineError::invalid_stock(value)),
    }
}

fn parse_price(value: &str) -> Result<Decimal, EngineError> {
    let price = parse_positive_real(value).ok_or_else(|| EngineError::invalid_price(value))?;
    if !price_in_range(price) {
        return Err(EngineError::price_out_of_range(value));
    }
    Ok(price)
}

fn non_empty(value: &str, field: &str) -> Result<String, EngineError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EngineError::missing_field(field))
    } else {
        Ok(value.to_string())
    }
}

/// Change one field of an existing product
///
/// Existing orders keep the unit price they were placed at.
pub fn modify_product(
    snapshot: &mut Snapshot,
    id: &str,
    field: ProductField,
    value: &str,
) -> Result<(), EngineError> {
    let id = id.trim();
    if snapshot.product(id).is_none() {
        return Err(EngineError::product_not_found(id));
    }

    let edit = parse_edit(field, value)?;
    let product = snapshot
        .product_mut(id)
        .ok_or_else(|| EngineError::product_not_found(id))?;

    let mut updated = product.clone();
    edit.apply(&mut updated);
    if updated.total_value().is_none() {
        return Err(EngineError::amount_overflow(id));
    }
    *product = updated;

    Ok(())
}
