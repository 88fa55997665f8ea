//! Engine property tests
//!
//! These tests exercise the engine through its public API against both the
//! in-memory store (to inject save failures and count save attempts) and the
//! file-backed store in a temporary directory.

use chrono::{TimeDelta, TimeZone, Utc};
use inventory_engine::core::{EngineSettings, InventoryEngine, ManualClock, SnapshotStore};
use inventory_engine::io::{FileAuditLog, FileStore, MemoryAuditLog, MemoryStore};
use inventory_engine::types::{EngineError, Operation, Outcome, ProductField};
use rstest::rstest;
use rust_decimal::Decimal;
use std::fs;
use tempfile::TempDir;

const PHONE: &str = "13800000000";

type MemoryEngine = InventoryEngine<MemoryStore, MemoryAuditLog, ManualClock>;

fn settings() -> EngineSettings {
    EngineSettings::default().with_hash_cost(8, 1)
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
}

fn memory_engine() -> MemoryEngine {
    InventoryEngine::open(
        MemoryStore::default(),
        MemoryAuditLog::default(),
        clock(),
        &settings(),
    )
}

/// Superuser session with product P1 (10.00 x 5) and order O1 (2 units)
fn stocked_engine() -> MemoryEngine {
    let mut engine = memory_engine();
    engine.authenticate("admin", "Admin1234").unwrap();
    engine.add_product("P1", "Widget", "tools", "10.00", "5").unwrap();
    engine.create_order("O1", PHONE, "P1", "2").unwrap();
    engine
}

#[test]
fn test_order_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("data.json"), dir.path().join("backup.json"));
    let audit = FileAuditLog::new(dir.path().join("audit.log"));
    let mut engine = InventoryEngine::open(store, audit, clock(), &settings());
    engine.authenticate("admin", "Admin1234").unwrap();

    engine.add_product("P1", "Widget", "tools", "10.00", "5").unwrap();
    let order = engine.create_order("O1", PHONE, "P1", "3").unwrap();

    assert_eq!(engine.snapshot().product("P1").unwrap().stock, 2);
    assert_eq!(order.total(), Some(Decimal::new(3000, 2)));
    assert_eq!(engine.store().load(), *engine.snapshot());

    engine.cancel_order("O1").unwrap();

    assert_eq!(engine.snapshot().product("P1").unwrap().stock, 5);
    assert!(engine.snapshot().order("O1").is_none());
    assert_eq!(engine.store().load(), *engine.snapshot());
}

#[rstest]
#[case::add_product(Operation::AddProduct)]
#[case::delete_product(Operation::DeleteProduct)]
#[case::modify_product_name(Operation::ModifyProduct)]
#[case::create_order(Operation::CreateOrder)]
#[case::cancel_order(Operation::CancelOrder)]
#[case::modify_account(Operation::ModifyAccount)]
fn test_failed_save_changes_nothing(#[case] operation: Operation) {
    let mut engine = stocked_engine();
    let before = engine.snapshot().clone();
    engine.store_mut().fail_saves(true);

    let result = match operation {
        Operation::AddProduct => engine.add_product("P2", "Gadget", "tools", "1", "1"),
        Operation::DeleteProduct => engine.delete_product("P1").map(|_| ()),
        Operation::ModifyProduct => engine.modify_product("P1", ProductField::Name, "Sprocket"),
        Operation::CreateOrder => engine.create_order("O2", PHONE, "P1", "3").map(|_| ()),
        Operation::CancelOrder => engine.cancel_order("O1").map(|_| ()),
        Operation::ModifyAccount => engine.modify_account("user1", "clerk", "Clerk2024"),
        _ => unreachable!(),
    };

    assert_eq!(result, Err(EngineError::Storage));
    assert_eq!(engine.snapshot(), &before);

    let entry = engine.audit().entries().last().unwrap();
    assert_eq!(entry.operation, operation);
    assert_eq!(
        entry.outcome,
        Outcome::Failure("Save failed: changes were not applied".to_string())
    );
}

#[test]
fn test_engine_recovers_after_failed_save() {
    let mut engine = stocked_engine();
    engine.store_mut().fail_saves(true);
    let _ = engine.create_order("O2", PHONE, "P1", "3");
    engine.store_mut().fail_saves(false);

    engine.create_order("O2", PHONE, "P1", "3").unwrap();

    assert_eq!(engine.snapshot().product("P1").unwrap().stock, 0);
}

#[rstest]
#[case::create_order(Operation::CreateOrder)]
#[case::cancel_order(Operation::CancelOrder)]
#[case::get_order(Operation::GetOrder)]
#[case::delete_product(Operation::DeleteProduct)]
#[case::modify_account(Operation::ModifyAccount)]
#[case::order_statistics(Operation::OrderStatistics)]
#[case::backup(Operation::Backup)]
#[case::restore(Operation::Restore)]
#[case::recent_logs(Operation::RecentLogs)]
#[case::clear_logs(Operation::ClearLogs)]
fn test_standard_account_rejected(#[case] operation: Operation) {
    let mut engine = stocked_engine();
    engine.authenticate("user1", "User123456").unwrap();
    let before = engine.snapshot().clone();
    let saves = engine.store().save_count();
    let entries = engine.audit().entries().len();

    let result = match operation {
        Operation::CreateOrder => engine.create_order("O2", PHONE, "P1", "1").map(|_| ()),
        Operation::CancelOrder => engine.cancel_order("O1").map(|_| ()),
        Operation::GetOrder => engine.get_order("O1").map(|_| ()),
        Operation::DeleteProduct => engine.delete_product("P1").map(|_| ()),
        Operation::ModifyAccount => engine.modify_account("user1", "boss", "Boss2024x"),
        Operation::OrderStatistics => engine.order_statistics().map(|_| ()),
        Operation::Backup => engine.backup(),
        Operation::Restore => engine.restore(),
        Operation::RecentLogs => engine.recent_logs(None).map(|_| ()),
        Operation::ClearLogs => engine.clear_logs(),
        _ => unreachable!(),
    };

    assert_eq!(
        result,
        Err(EngineError::permission_denied(operation.as_str()))
    );
    assert_eq!(engine.snapshot(), &before);
    assert_eq!(engine.store().save_count(), saves);
    assert_eq!(engine.audit().entries().len(), entries + 1);
}

#[test]
fn test_standard_account_manages_products() {
    let mut engine = stocked_engine();
    engine.authenticate("user1", "User123456").unwrap();

    engine.add_product("P2", "Gadget", "tools", "2.50", "4").unwrap();
    engine
        .modify_product("P2", ProductField::Stock, "10")
        .unwrap();
    let products = engine.list_products().unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[1].stock, 10);
    assert_eq!(products[1].total_value(), Some(Decimal::new(2500, 2)));
}

#[test]
fn test_lock_window_measured_from_last_failure() {
    let mut engine = memory_engine();

    engine.authenticate("admin", "x").unwrap_err();
    engine.clock().advance(TimeDelta::seconds(20));
    engine.authenticate("admin", "x").unwrap_err();
    engine.authenticate("admin", "x").unwrap_err();

    engine.clock().advance(TimeDelta::seconds(25));
    assert_eq!(
        engine.authenticate("admin", "Admin1234"),
        Err(EngineError::account_locked("admin", 5))
    );
    // The rejected attempt did not move the window
    engine.clock().advance(TimeDelta::seconds(5));
    assert!(engine.authenticate("admin", "Admin1234").is_ok());

    let account = engine.current_account().unwrap();
    assert_eq!(account.failed_logins, 0);
    assert!(account.last_failure.is_none());
}

#[test]
fn test_configured_lockout_policy() {
    let settings = EngineSettings::new(1, 60).with_hash_cost(8, 1);
    let mut engine = InventoryEngine::open(
        MemoryStore::default(),
        MemoryAuditLog::default(),
        clock(),
        &settings,
    );

    engine.authenticate("user1", "x").unwrap_err();

    engine.clock().advance(TimeDelta::seconds(59));
    assert_eq!(
        engine.authenticate("user1", "User123456"),
        Err(EngineError::account_locked("user1", 1))
    );
}

#[test]
fn test_unit_price_frozen_at_creation() {
    let mut engine = stocked_engine();

    engine
        .modify_product("P1", ProductField::Price, "99.99")
        .unwrap();

    let detail = engine.get_order("O1").unwrap();
    assert_eq!(detail.order.unit_price, Decimal::new(1000, 2));
    assert_eq!(detail.order.total(), Some(Decimal::new(2000, 2)));
    assert_eq!(detail.product_label(), "Widget");
}

#[test]
fn test_deleted_product_keeps_orders() {
    let mut engine = stocked_engine();

    engine.delete_product("P1").unwrap();

    let detail = engine.get_order("O1").unwrap();
    assert_eq!(detail.product_label(), "unknown product");
    assert_eq!(
        engine.cancel_order("O1"),
        Err(EngineError::order_product_missing("O1", "P1"))
    );

    let statistics = engine.order_statistics().unwrap();
    assert!(statistics.categories.is_empty());
    assert_eq!(statistics.unknown_product.quantity, 2);
}

#[test]
fn test_backup_twice_matches_backup_once() {
    let dir = TempDir::new().unwrap();
    let backup_path = dir.path().join("backup.json");
    let store = FileStore::new(dir.path().join("data.json"), &backup_path);
    let audit = FileAuditLog::new(dir.path().join("audit.log"));
    let mut engine = InventoryEngine::open(store, audit, clock(), &settings());
    engine.authenticate("admin", "Admin1234").unwrap();
    engine.add_product("P1", "Widget", "tools", "10.00", "5").unwrap();

    engine.backup().unwrap();
    let once = fs::read(&backup_path).unwrap();
    engine.backup().unwrap();
    let twice = fs::read(&backup_path).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_restore_round_trip() {
    let mut engine = stocked_engine();
    engine.backup().unwrap();
    let backed_up = engine.snapshot().clone();

    engine.cancel_order("O1").unwrap();
    engine.delete_product("P1").unwrap();
    engine.restore().unwrap();

    assert_eq!(engine.snapshot(), &backed_up);
    assert_eq!(engine.store().primary(), Some(&backed_up));
}

#[test]
fn test_restore_ends_session_of_missing_account() {
    let mut engine = stocked_engine();
    engine.backup().unwrap();
    engine.modify_account("admin", "root", "Rootpass1").unwrap();

    engine.restore().unwrap();

    assert!(engine.current_account().is_none());
    assert!(engine.snapshot().account("admin").is_some());
}

#[test]
fn test_failed_backup_reported() {
    let mut engine = stocked_engine();
    engine.store_mut().fail_backups(true);

    assert_eq!(engine.backup(), Err(EngineError::BackupFailed));
    assert_eq!(engine.shutdown(), Err(EngineError::BackupFailed));
}

#[test]
fn test_logs_on_disk() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit.log");
    let store = FileStore::new(dir.path().join("data.json"), dir.path().join("backup.json"));
    let mut engine = InventoryEngine::open(store, FileAuditLog::new(&log_path), clock(), &settings());
    engine.authenticate("admin", "Admin1234").unwrap();
    for index in 0..12 {
        let _ = engine.get_order(&format!("O{}", index));
    }

    let recent = engine.recent_logs(None).unwrap();
    assert_eq!(recent.len(), 10);
    assert!(recent[9].ends_with("fail: Order O11 does not exist"));

    let filtered = engine.recent_logs(Some("o3 does")).unwrap();
    assert_eq!(filtered.len(), 1);

    engine.clear_logs().unwrap();
    let remaining = fs::read_to_string(&log_path).unwrap();
    assert_eq!(remaining.lines().count(), 1);
    assert!(remaining.contains(" - clear_logs - "));
}

#[test]
fn test_logs_missing_file() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit.log");
    let store = FileStore::new(dir.path().join("data.json"), dir.path().join("backup.json"));
    let mut engine = InventoryEngine::open(store, FileAuditLog::new(&log_path), clock(), &settings());
    engine.authenticate("admin", "Admin1234").unwrap();
    fs::remove_file(&log_path).unwrap();

    assert_eq!(engine.clear_logs(), Err(EngineError::LogUnavailable));
    fs::remove_file(&log_path).unwrap();
    assert_eq!(engine.recent_logs(None), Ok(vec![]));
}
