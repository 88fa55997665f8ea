//! JSON store format
//!
//! This module centralizes the on-disk representation of a snapshot:
//! - Record structures for accounts, products and orders
//! - Conversion between records and domain types
//! - Whole-document encoding and decoding
//!
//! Records are decoded one at a time. A record that does not decode, or that
//! reuses an identifier already seen, is skipped with a warning and the rest
//! of the document still loads. All functions are pure (no I/O).

use crate::types::{
    Account, Credential, Order, Privilege, Product, Snapshot, StoreError, MAX_PRICE,
    TIMESTAMP_FORMAT,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::warn;

/// Top-level document: three independently decoded record lists
#[derive(Debug, Default, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    products: Vec<Value>,
    #[serde(default)]
    orders: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct EncodedDocument {
    users: Vec<UserRecord>,
    products: Vec<ProductRecord>,
    orders: Vec<OrderRecord>,
}

/// Stored account
///
/// Older stores carry `password` in plaintext instead of `password_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub is_super: bool,
    #[serde(default)]
    pub login_fail_count: u32,
    /// Epoch seconds of the last failed login, 0 when there is none
    #[serde(default)]
    pub lock_time: f64,
}

/// Stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub stock: u32,
}

/// Stored order
///
/// `total_amount` is written for readers of the file and recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub phone: String,
    pub product_id: String,
    pub buy_count: u32,
    pub product_price: f64,
    #[serde(default)]
    pub total_amount: f64,
    pub create_time: String,
}

impl From<&Account> for UserRecord {
    fn from(account: &Account) -> Self {
        let (password_hash, password) = match &account.credential {
            Credential::Hashed(hash) => (Some(hash.clone()), None),
            Credential::Plaintext(password) => (None, Some(password.clone())),
        };
        UserRecord {
            username: account.id.clone(),
            password_hash,
            password,
            is_super: account.is_superuser(),
            login_fail_count: account.failed_logins,
            lock_time: account
                .last_failure
                .map(|at| at.timestamp_millis() as f64 / 1000.0)
                .unwrap_or(0.0),
        }
    }
}

impl TryFrom<UserRecord> for Account {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let credential = match (record.password_hash, record.password) {
            (Some(hash), _) => Credential::Hashed(hash),
            (None, Some(password)) => Credential::Plaintext(password),
            (None, None) => return Err(format!("account '{}' has no credential", record.username)),
        };

        let last_failure = if record.lock_time > 0.0 {
            let millis = (record.lock_time * 1000.0).round() as i64;
            Some(
                DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or_else(|| format!("invalid lock_time {}", record.lock_time))?,
            )
        } else {
            None
        };

        let privilege = if record.is_super {
            Privilege::Superuser
        } else {
            Privilege::Standard
        };

        Ok(Account {
            id: record.username,
            credential,
            privilege,
            failed_logins: record.login_fail_count,
            last_failure,
        })
    }
}

impl TryFrom<&Product> for ProductRecord {
    type Error = StoreError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Ok(ProductRecord {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: money_to_f64(product.price)?,
            stock: product.stock,
        })
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = String;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let price = money_from_f64(record.price)?;
        Ok(Product::new(
            record.product_id,
            record.name,
            record.category,
            price,
            record.stock,
        ))
    }
}

impl TryFrom<&Order> for OrderRecord {
    type Error = StoreError;

    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        let total = order.total().ok_or_else(|| StoreError::Encoding {
            message: format!("total of order {} does not fit a decimal", order.id),
        })?;

        Ok(OrderRecord {
            order_id: order.id.clone(),
            phone: order.phone.clone(),
            product_id: order.product_id.clone(),
            buy_count: order.quantity,
            product_price: money_to_f64(order.unit_price)?,
            total_amount: money_to_f64(total)?,
            create_time: order.created_at.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = String;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        if record.buy_count == 0 {
            return Err(format!("order '{}' has a zero quantity", record.order_id));
        }
        let unit_price = money_from_f64(record.product_price)?;
        let created_at = NaiveDateTime::parse_from_str(&record.create_time, TIMESTAMP_FORMAT)
            .map_err(|e| format!("invalid create_time '{}': {}", record.create_time, e))?;

        Ok(Order {
            id: record.order_id,
            phone: record.phone,
            product_id: record.product_id,
            quantity: record.buy_count,
            unit_price,
            created_at,
        })
    }
}

/// Convert a stored price through its shortest decimal text
fn money_from_f64(value: f64) -> Result<Decimal, String> {
    let amount = Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_scientific(&value.to_string()))
        .map_err(|e| format!("invalid amount {}: {}", value, e))?;
    if amount <= Decimal::ZERO {
        return Err(format!("amount {} is not greater than 0", value));
    }
    if amount > Decimal::from(MAX_PRICE) {
        return Err(format!("amount {} is above {}", value, MAX_PRICE));
    }
    Ok(amount)
}

fn money_to_f64(amount: Decimal) -> Result<f64, StoreError> {
    amount
        .to_f64()
        .ok_or_else(|| StoreError::Encoding {
            message: format!("amount {} cannot be written as a number", amount),
        })
}

/// Decode a list of records, skipping malformed ones and repeated identifiers
fn decode_records<R, T>(
    kind: &str,
    values: Vec<Value>,
    id_of: impl Fn(&T) -> &str,
) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = String>,
{
    let mut seen = HashSet::new();
    let mut decoded = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        let item = serde_json::from_value::<R>(value)
            .map_err(|e| e.to_string())
            .and_then(T::try_from);

        match item {
            Ok(item) => {
                if seen.insert(id_of(&item).to_string()) {
                    decoded.push(item);
                } else {
                    warn!(kind, index, id = id_of(&item), "Skipping record with duplicate identifier");
                }
            }
            Err(reason) => warn!(kind, index, %reason, "Skipping malformed record"),
        }
    }

    decoded
}

/// Decode a store document
///
/// # Errors
///
/// Returns an error only if the document as a whole is not a JSON object
/// with the expected lists. Individual bad records are skipped.
pub fn decode_snapshot(text: &str) -> Result<Snapshot, StoreError> {
    let document: StoreDocument = serde_json::from_str(text)?;

    let accounts = decode_records::<UserRecord, Account>("account", document.users, |a| a.id.as_str());
    let products =
        decode_records::<ProductRecord, Product>("product", document.products, |p| p.id.as_str());
    let orders = decode_records::<OrderRecord, Order>("order", document.orders, |o| o.id.as_str());

    Ok(Snapshot::new(accounts, products, orders))
}

/// Encode a snapshot as a pretty-printed store document
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, StoreError> {
    let document = EncodedDocument {
        users: snapshot.accounts.iter().map(UserRecord::from).collect(),
        products: snapshot
            .products
            .iter()
            .map(ProductRecord::try_from)
            .collect::<Result<_, _>>()?,
        orders: snapshot
            .orders
            .iter()
            .map(OrderRecord::try_from)
            .collect::<Result<_, _>>()?,
    };

    Ok(serde_json::to_string_pretty(&document)?)
}
