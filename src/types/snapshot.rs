//! The complete in-memory state: accounts, products and orders

use crate::types::account::Account;
use crate::types::order::Order;
use crate::types::product::Product;

/// Snapshot of every entity the engine manages
///
/// Collections keep insertion order. Identifier uniqueness is enforced by the
/// operations that insert into them, not by the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}

impl Snapshot {
    pub fn new(accounts: Vec<Account>, products: Vec<Product>, orders: Vec<Order>) -> Self {
        Snapshot {
            accounts,
            products,
            orders,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.products.is_empty() && self.orders.is_empty()
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }
}
