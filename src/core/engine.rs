//! Inventory transaction engine
//!
//! This module provides the InventoryEngine that orchestrates every operator
//! operation by coordinating the AccountManager, the catalog and order book
//! functions, and the injected store, audit sink and clock.
//!
//! Every operation follows the same template:
//! - Permission check against the logged-in account
//! - Validation and mutation on a copy of the current snapshot
//! - Commit: the copy is saved and only then replaces the live snapshot
//! - Exactly one audit entry, success or failure
//!
//! Because mutations happen on a copy, a failed save leaves the live snapshot
//! untouched and no manual rollback is needed.

use crate::core::account_manager::AccountManager;
use crate::core::catalog;
use crate::core::clock::SystemClock;
use crate::core::order_book;
use crate::core::settings::EngineSettings;
use crate::core::statistics::OrderStatistics;
use crate::core::traits::{AuditSink, Clock, SnapshotStore};
use crate::types::{
    Account, AccountId, AuditEntry, EngineError, Operation, Order, OrderDetail, Outcome,
    Privilege, Product, ProductField, Snapshot, ANONYMOUS_ACTOR, SYSTEM_ACTOR,
};
use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, Utc};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Number of lines returned by [`InventoryEngine::recent_logs`]
pub const RECENT_LOG_LIMIT: usize = 10;

/// Inventory and order transaction engine
///
/// Owns the live snapshot and the current session. Callers never mutate
/// entities directly; everything goes through an operation.
pub struct InventoryEngine<S, A, C = SystemClock> {
    store: S,
    audit: A,
    clock: C,
    accounts: AccountManager,
    state: Snapshot,
    session: Option<AccountId>,
}

impl<S: SnapshotStore, A: AuditSink, C: Clock> InventoryEngine<S, A, C> {
    /// Open the engine over `store`
    ///
    /// Loads the stored snapshot, seeds the default accounts if there are
    /// none, and upgrades plaintext credentials. If any of that changed the
    /// snapshot it is saved straight away. A failed save is audited and
    /// logged, but the loaded snapshot is still used.
    pub fn open(store: S, audit: A, clock: C, settings: &EngineSettings) -> Self {
        let mut engine = InventoryEngine {
            store,
            audit,
            clock,
            accounts: AccountManager::new(settings.lockout_policy(), settings.hasher()),
            state: Snapshot::default(),
            session: None,
        };

        let started = Instant::now();
        let outcome = match engine.load_initial() {
            Ok(detail) => Outcome::Success(detail),
            Err(e) => Outcome::Failure(e.to_string()),
        };
        engine.record(Operation::Open, SYSTEM_ACTOR, started, outcome);

        engine
    }

    fn load_initial(&mut self) -> Result<String, EngineError> {
        let mut loaded = self.store.load();

        let saved = match self.prepare(&mut loaded) {
            Ok(true) => self.store.save(&loaded).map_err(|e| {
                error!(error = %e, "Failed to save prepared snapshot");
                EngineError::Storage
            }),
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };

        let detail = format!(
            "{} accounts, {} products, {} orders",
            loaded.accounts.len(),
            loaded.products.len(),
            loaded.orders.len()
        );
        info!(
            accounts = loaded.accounts.len(),
            products = loaded.products.len(),
            orders = loaded.orders.len(),
            "Snapshot loaded"
        );
        self.state = loaded;

        saved.map(|()| detail)
    }

    /// Seed accounts into an account-less snapshot and hash plaintext credentials
    ///
    /// # Returns
    ///
    /// Whether the snapshot changed
    fn prepare(&self, snapshot: &mut Snapshot) -> Result<bool, EngineError> {
        let mut changed = false;

        if snapshot.accounts.is_empty() {
            snapshot.accounts = self.accounts.seed_accounts()?;
            info!("No accounts found, seeded default accounts");
            changed = true;
        }

        if self.accounts.upgrade_credentials(&mut snapshot.accounts)? > 0 {
            changed = true;
        }

        Ok(changed)
    }

    /// Log in as `id`
    ///
    /// Login bookkeeping (failure counter, last failure time) changes the
    /// live snapshot directly and is persisted with the next commit. A failed
    /// attempt leaves any existing session in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No account has identifier `id`
    /// - The account is locked out
    /// - The password does not match
    pub fn authenticate(&mut self, id: &str, password: &str) -> Result<(), EngineError> {
        let id = id.trim();
        self.audited(Operation::Authenticate, |engine| {
            let now = engine.clock.now();
            engine
                .accounts
                .authenticate(&mut engine.state.accounts, id, password, now)?;
            engine.session = Some(id.to_string());
            info!(account = id, "Logged in");
            Ok(((), id.to_string()))
        })
    }

    /// End the current session, if any
    pub fn logout(&mut self) {
        let started = Instant::now();
        let (actor, detail) = match self.session.take() {
            Some(id) => (id.clone(), id),
            None => (ANONYMOUS_ACTOR.to_string(), "no active session".to_string()),
        };
        self.record(Operation::Logout, &actor, started, Outcome::Success(detail));
    }

    /// Rename account `old_id` to `new_id` and replace its password
    ///
    /// Requires superuser privilege. Renaming the logged-in account keeps the
    /// session under the new identifier.
    pub fn modify_account(
        &mut self,
        old_id: &str,
        new_id: &str,
        new_password: &str,
    ) -> Result<(), EngineError> {
        let old_id = old_id.trim();
        let new_id = new_id.trim();
        self.audited(Operation::ModifyAccount, |engine| {
            engine.require(Privilege::Superuser, Operation::ModifyAccount)?;

            let mut next = engine.state.clone();
            engine
                .accounts
                .modify_account(&mut next, old_id, new_id, new_password)?;
            engine.commit(next)?;

            if engine.session.as_deref() == Some(old_id) {
                engine.session = Some(new_id.to_string());
            }
            Ok(((), format!("{} -> {}", old_id, new_id)))
        })
    }

    /// Add a product from raw operator input
    pub fn add_product(
        &mut self,
        id: &str,
        name: &str,
        category: &str,
        price: &str,
        stock: &str,
    ) -> Result<(), EngineError> {
        self.audited(Operation::AddProduct, |engine| {
            engine.require(Privilege::Standard, Operation::AddProduct)?;

            let mut next = engine.state.clone();
            catalog::add_product(&mut next, id, name, category, price, stock)?;
            engine.commit(next)?;

            Ok(((), id.trim().to_string()))
        })
    }

    /// Every product, in insertion order
    pub fn list_products(&mut self) -> Result<Vec<Product>, EngineError> {
        self.audited(Operation::ListProducts, |engine| {
            engine.require(Privilege::Standard, Operation::ListProducts)?;

            let products = engine.state.products.clone();
            let detail = format!("{} products", products.len());
            Ok((products, detail))
        })
    }

    /// Delete a product, returning it
    ///
    /// Orders that reference it are kept.
    pub fn delete_product(&mut self, id: &str) -> Result<Product, EngineError> {
        self.audited(Operation::DeleteProduct, |engine| {
            engine.require(Privilege::Superuser, Operation::DeleteProduct)?;

            let mut next = engine.state.clone();
            let removed = catalog::remove_product(&mut next, id)?;
            engine.commit(next)?;

            let detail = removed.id.clone();
            Ok((removed, detail))
        })
    }

    /// Change one field of a product
    ///
    /// `value` is raw operator input, validated according to `field`.
    pub fn modify_product(
        &mut self,
        id: &str,
        field: ProductField,
        value: &str,
    ) -> Result<(), EngineError> {
        self.audited(Operation::ModifyProduct, |engine| {
            engine.require(Privilege::Standard, Operation::ModifyProduct)?;

            let mut next = engine.state.clone();
            catalog::modify_product(&mut next, id, field, value)?;
            engine.commit(next)?;

            Ok(((), format!("{} {}", id.trim(), field)))
        })
    }

    /// Place an order, taking `quantity` out of the product's stock
    pub fn create_order(
        &mut self,
        order_id: &str,
        phone: &str,
        product_id: &str,
        quantity: &str,
    ) -> Result<Order, EngineError> {
        self.audited(Operation::CreateOrder, |engine| {
            engine.require(Privilege::Superuser, Operation::CreateOrder)?;

            let created_at = local_timestamp(engine.clock.now());
            let mut next = engine.state.clone();
            let order =
                order_book::place_order(&mut next, order_id, phone, product_id, quantity, created_at)?;
            engine.commit(next)?;

            let detail = format!("{} ({} x {})", order.id, order.product_id, order.quantity);
            Ok((order, detail))
        })
    }

    /// Look up an order with its product name
    pub fn get_order(&mut self, order_id: &str) -> Result<OrderDetail, EngineError> {
        self.audited(Operation::GetOrder, |engine| {
            engine.require(Privilege::Superuser, Operation::GetOrder)?;

            let detail = order_book::order_detail(&engine.state, order_id)?;
            let id = detail.order.id.clone();
            Ok((detail, id))
        })
    }

    /// Cancel an order, returning its quantity to stock
    pub fn cancel_order(&mut self, order_id: &str) -> Result<Order, EngineError> {
        self.audited(Operation::CancelOrder, |engine| {
            engine.require(Privilege::Superuser, Operation::CancelOrder)?;

            let mut next = engine.state.clone();
            let cancelled = order_book::cancel_order(&mut next, order_id)?;
            engine.commit(next)?;

            let detail = cancelled.id.clone();
            Ok((cancelled, detail))
        })
    }

    /// Order quantities and amounts grouped by product category
    pub fn order_statistics(&mut self) -> Result<OrderStatistics, EngineError> {
        self.audited(Operation::OrderStatistics, |engine| {
            engine.require(Privilege::Superuser, Operation::OrderStatistics)?;

            let statistics = OrderStatistics::from_snapshot(&engine.state)?;
            let detail = format!("{} orders", engine.state.orders.len());
            Ok((statistics, detail))
        })
    }

    /// Copy the saved store to the backup location
    pub fn backup(&mut self) -> Result<(), EngineError> {
        self.audited(Operation::Backup, |engine| {
            engine.require(Privilege::Superuser, Operation::Backup)?;

            engine.store.backup().map_err(|e| {
                if e.is_not_found() {
                    warn!(error = %e, "Nothing to back up");
                    EngineError::NothingToBackUp
                } else {
                    error!(error = %e, "Backup failed");
                    EngineError::BackupFailed
                }
            })?;

            Ok(((), String::new()))
        })
    }

    /// Replace the live snapshot with the backup and save it
    ///
    /// The restored snapshot is prepared like a freshly opened one. If the
    /// logged-in account does not exist in the backup, the session ends.
    pub fn restore(&mut self) -> Result<(), EngineError> {
        self.audited(Operation::Restore, |engine| {
            engine.require(Privilege::Superuser, Operation::Restore)?;

            let mut next = engine.store.restore().map_err(|e| {
                warn!(error = %e, "Backup could not be restored");
                EngineError::RestoreUnavailable
            })?;
            engine.prepare(&mut next)?;
            engine.commit(next)?;

            if let Some(id) = engine.session.as_deref() {
                if engine.state.account(id).is_none() {
                    info!(account = id, "Session ended, account not in restored data");
                    engine.session = None;
                }
            }

            let detail = format!(
                "{} accounts, {} products, {} orders",
                engine.state.accounts.len(),
                engine.state.products.len(),
                engine.state.orders.len()
            );
            Ok(((), detail))
        })
    }

    /// The most recent audit lines, optionally filtered by `keyword`
    ///
    /// A missing audit log reads as empty.
    pub fn recent_logs(&mut self, keyword: Option<&str>) -> Result<Vec<String>, EngineError> {
        self.audited(Operation::RecentLogs, |engine| {
            engine.require(Privilege::Superuser, Operation::RecentLogs)?;

            let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
            let lines = match engine.audit.recent(RECENT_LOG_LIMIT, keyword) {
                Ok(lines) => lines,
                Err(e) if e.is_not_found() => Vec::new(),
                Err(e) => {
                    error!(error = %e, "Failed to read audit log");
                    return Err(EngineError::LogFailed);
                }
            };

            let detail = match keyword {
                Some(keyword) => format!("{} lines matching '{}'", lines.len(), keyword),
                None => format!("{} lines", lines.len()),
            };
            Ok((lines, detail))
        })
    }

    /// Truncate the audit log
    pub fn clear_logs(&mut self) -> Result<(), EngineError> {
        self.audited(Operation::ClearLogs, |engine| {
            engine.require(Privilege::Superuser, Operation::ClearLogs)?;

            engine.audit.clear().map_err(|e| {
                if e.is_not_found() {
                    EngineError::LogUnavailable
                } else {
                    error!(error = %e, "Failed to clear audit log");
                    EngineError::LogFailed
                }
            })?;

            Ok(((), String::new()))
        })
    }

    /// Save the live snapshot, back it up and end the session
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        self.audited(Operation::Shutdown, |engine| {
            engine.store.save(&engine.state).map_err(|e| {
                error!(error = %e, "Failed to save on shutdown");
                EngineError::Storage
            })?;
            engine.store.backup().map_err(|e| {
                error!(error = %e, "Failed to back up on shutdown");
                EngineError::BackupFailed
            })?;

            engine.session = None;
            Ok(((), String::new()))
        })
    }

    /// The live snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// The logged-in account
    pub fn current_account(&self) -> Option<&Account> {
        self.session
            .as_deref()
            .and_then(|id| self.state.account(id))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn audit_mut(&mut self) -> &mut A {
        &mut self.audit
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Check that the logged-in account holds `required`
    fn require(&self, required: Privilege, operation: Operation) -> Result<(), EngineError> {
        let Some(account) = self.current_account() else {
            warn!(%operation, "Rejected, not logged in");
            return Err(EngineError::NotAuthenticated);
        };

        if account.privilege.satisfies(required) {
            Ok(())
        } else {
            warn!(
                %operation,
                account = %account.id,
                privilege = %account.privilege,
                "Rejected, insufficient privilege"
            );
            Err(EngineError::permission_denied(operation.as_str()))
        }
    }

    /// Save `next` and make it the live snapshot
    ///
    /// On failure the live snapshot is left as it was.
    fn commit(&mut self, next: Snapshot) -> Result<(), EngineError> {
        match self.store.save(&next) {
            Ok(()) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Commit failed, changes discarded");
                Err(EngineError::Storage)
            }
        }
    }

    /// Run `operation` and record its audit entry
    ///
    /// The actor is the session after the operation, falling back to the
    /// session before it, so both login and logout are attributed.
    fn audited<T>(
        &mut self,
        operation: Operation,
        run: impl FnOnce(&mut Self) -> Result<(T, String), EngineError>,
    ) -> Result<T, EngineError> {
        let started = Instant::now();
        let before = self.session.clone();

        let result = run(self);

        let actor = self
            .session
            .clone()
            .or(before)
            .unwrap_or_else(|| ANONYMOUS_ACTOR.to_string());
        let outcome = match &result {
            Ok((_, detail)) => Outcome::Success(detail.clone()),
            Err(e) => Outcome::Failure(e.to_string()),
        };
        self.record(operation, &actor, started, outcome);

        result.map(|(value, _)| value)
    }

    fn record(&mut self, operation: Operation, actor: &str, started: Instant, outcome: Outcome) {
        if outcome.is_success() {
            debug!(%operation, actor, detail = outcome.detail(), "Operation succeeded");
        } else {
            warn!(%operation, actor, reason = outcome.detail(), "Operation failed");
        }

        let entry = AuditEntry {
            timestamp: local_timestamp(self.clock.now()),
            actor: actor.to_string(),
            operation,
            elapsed: started.elapsed(),
            outcome,
        };
        self.audit.record(&entry);
    }
}

/// Local wall time at whole-second precision
fn local_timestamp(now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&Local).naive_local().trunc_subsecs(0)
}
