//! CSV reports
//!
//! Product listings and order statistics rendered as CSV, money with two
//! decimal places.

use crate::core::statistics::{CategoryTotals, OrderStatistics};
use crate::types::{round_money, Product};
use csv::Writer;
use std::io::Write;

/// Write products with columns: id, name, category, price, stock, total_value
///
/// Products are written in the order given.
pub fn write_products_csv(products: &[Product], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "name", "category", "price", "stock", "total_value"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for product in products {
        let total_value = product
            .total_value()
            .ok_or_else(|| format!("Value of product {} is too large", product.id))?;
        writer
            .write_record(&[
                product.id.clone(),
                product.name.clone(),
                product.category.clone(),
                format!("{:.2}", round_money(product.price)),
                product.stock.to_string(),
                format!("{:.2}", total_value),
            ])
            .map_err(|e| format!("Failed to write product record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write order statistics with columns: category, quantity, amount
///
/// Categories are sorted by name. Orders whose product was deleted are
/// written as an `unknown product` row, and a final `total` row sums every
/// order.
pub fn write_statistics_csv(
    statistics: &OrderStatistics,
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["category", "quantity", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let unknown = (statistics.unknown_product.quantity > 0)
        .then_some(("unknown product", statistics.unknown_product));
    let rows = statistics
        .categories
        .iter()
        .map(|(category, totals)| (category.as_str(), *totals))
        .chain(unknown)
        .chain(std::iter::once(("total", statistics.total)));

    for (label, CategoryTotals { quantity, amount }) in rows {
        writer
            .write_record(&[label.to_string(), quantity.to_string(), format!("{:.2}", amount)])
            .map_err(|e| format!("Failed to write statistics record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
