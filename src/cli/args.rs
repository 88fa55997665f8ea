use crate::core::settings::{EngineSettings, DEFAULT_LOCKOUT_SECS, DEFAULT_MAX_FAILED_LOGINS};
use crate::types::ProductField;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage shop inventory, orders and operator accounts
#[derive(Parser, Debug)]
#[command(name = "inventory-engine")]
#[command(about = "Manage shop inventory, orders and operator accounts", long_about = None)]
pub struct CliArgs {
    /// Primary data file
    #[arg(
        long = "data-file",
        value_name = "PATH",
        env = "INVENTORY_DATA_FILE",
        default_value = "mall_data.json"
    )]
    pub data_file: PathBuf,

    /// Backup data file
    #[arg(
        long = "backup-file",
        value_name = "PATH",
        env = "INVENTORY_BACKUP_FILE",
        default_value = "mall_backup.json"
    )]
    pub backup_file: PathBuf,

    /// Audit log file
    #[arg(
        long = "audit-log",
        value_name = "PATH",
        env = "INVENTORY_AUDIT_LOG",
        default_value = "mall_system.log"
    )]
    pub audit_log: PathBuf,

    /// Account to log in as before running the command
    #[arg(long = "user", value_name = "ACCOUNT", env = "INVENTORY_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(
        long = "password",
        value_name = "PASSWORD",
        env = "INVENTORY_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Consecutive failed logins that lock an account
    #[arg(
        long = "max-failed-logins",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_FAILED_LOGINS
    )]
    pub max_failed_logins: u32,

    /// Lock window in seconds, measured from the last failed login
    #[arg(
        long = "lockout-secs",
        value_name = "SECS",
        default_value_t = DEFAULT_LOCKOUT_SECS
    )]
    pub lockout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Engine settings from the lockout options
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn to_settings(&self) -> EngineSettings {
        EngineSettings::new(self.max_failed_logins, self.lockout_secs)
    }

    /// Login credentials, if an account was given
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.user
            .as_deref()
            .map(|user| (user, self.password.as_deref().unwrap_or_default()))
    }
}

/// Top-level command
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    #[command(flatten)]
    Run(EngineCommand),

    /// Interactive session reading commands from stdin
    Shell,
}

/// Operations that run against the engine
///
/// Every value is passed through as typed by the operator; the engine does
/// all numeric and format validation.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Add a product
    AddProduct {
        id: String,
        name: String,
        category: String,
        price: String,
        stock: String,
    },

    /// List every product as CSV
    ListProducts,

    /// Delete a product (superuser)
    DeleteProduct { id: String },

    /// Change one field of a product
    ModifyProduct {
        id: String,
        /// One of: name, category, price, stock
        field: ProductField,
        value: String,
    },

    /// Place an order (superuser)
    CreateOrder {
        order_id: String,
        phone: String,
        product_id: String,
        quantity: String,
    },

    /// Show one order (superuser)
    GetOrder { order_id: String },

    /// Cancel an order and return its stock (superuser)
    CancelOrder { order_id: String },

    /// Order totals by category as CSV (superuser)
    Statistics,

    /// Rename an account and set its password (superuser)
    ModifyAccount {
        old_id: String,
        new_id: String,
        new_password: String,
    },

    /// Copy the data file to the backup file (superuser)
    Backup,

    /// Replace all data with the backup (superuser)
    Restore,

    /// Show the last audit lines (superuser)
    Logs {
        /// Only lines containing this text, ignoring case
        keyword: Option<String>,
    },

    /// Truncate the audit log (superuser)
    ClearLogs,
}

/// One line of input in the interactive shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands accepted by the interactive shell
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ShellCommand {
    #[command(flatten)]
    Run(EngineCommand),

    /// Log in
    Login { user: String, password: String },

    /// Log out
    Logout,

    /// Save, back up and leave the shell
    #[command(alias = "quit")]
    Exit,
}
