// CLI module
// Command-line interface, argument parsing and command execution

mod args;

pub use args::{CliArgs, Command, EngineCommand, ShellCommand, ShellLine};

use crate::core::traits::{AuditSink, Clock, SnapshotStore};
use crate::core::{InventoryEngine, SystemClock};
use crate::io::{write_products_csv, write_statistics_csv, FileAuditLog, FileStore};
use crate::types::{EngineError, Order, TIMESTAMP_FORMAT};
use clap::Parser;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::info;

/// Failure of a CLI invocation
#[derive(Debug, Error)]
pub enum CliError {
    /// The engine rejected the operation
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Writing to the terminal failed
    #[error("Output failed: {0}")]
    Io(#[from] io::Error),

    /// Writing a report failed
    #[error("{0}")]
    Report(String),
}

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or --help), clap
/// displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Open the engine over the configured files and run the command
pub fn run(args: CliArgs) -> Result<(), CliError> {
    let store = FileStore::new(args.data_file.clone(), args.backup_file.clone());
    let audit = FileAuditLog::new(args.audit_log.clone());
    let mut engine = InventoryEngine::open(store, audit, SystemClock, &args.to_settings());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command.clone() {
        Command::Run(command) => {
            if let Some((user, password)) = args.credentials() {
                engine.authenticate(user, password)?;
            }
            execute(&mut engine, command, &mut out)
        }
        Command::Shell => {
            if let Some((user, password)) = args.credentials() {
                if let Err(e) = engine.authenticate(user, password) {
                    writeln!(out, "Error: {}", e)?;
                }
            }
            let stdin = io::stdin();
            run_shell(&mut engine, stdin.lock(), &mut out)
        }
    }
}

/// Run one engine command, writing its result to `out`
pub fn execute<S, A, C>(
    engine: &mut InventoryEngine<S, A, C>,
    command: EngineCommand,
    out: &mut dyn Write,
) -> Result<(), CliError>
where
    S: SnapshotStore,
    A: AuditSink,
    C: Clock,
{
    match command {
        EngineCommand::AddProduct {
            id,
            name,
            category,
            price,
            stock,
        } => {
            engine.add_product(&id, &name, &category, &price, &stock)?;
            writeln!(out, "Product {} added", id.trim())?;
        }
        EngineCommand::ListProducts => {
            let products = engine.list_products()?;
            write_products_csv(&products, out).map_err(CliError::Report)?;
        }
        EngineCommand::DeleteProduct { id } => {
            let product = engine.delete_product(&id)?;
            writeln!(out, "Product {} ({}) deleted", product.id, product.name)?;
        }
        EngineCommand::ModifyProduct { id, field, value } => {
            engine.modify_product(&id, field, &value)?;
            writeln!(out, "Product {} {} updated", id, field)?;
        }
        EngineCommand::CreateOrder {
            order_id,
            phone,
            product_id,
            quantity,
        } => {
            let order = engine.create_order(&order_id, &phone, &product_id, &quantity)?;
            writeln!(out, "Order {} created, total {:.2}", order.id, order_total(&order)?)?;
        }
        EngineCommand::GetOrder { order_id } => {
            let detail = engine.get_order(&order_id)?;
            let order = &detail.order;
            writeln!(out, "Order:      {}", order.id)?;
            writeln!(out, "Phone:      {}", order.phone)?;
            writeln!(out, "Product:    {} ({})", detail.product_label(), order.product_id)?;
            writeln!(out, "Quantity:   {}", order.quantity)?;
            writeln!(out, "Unit price: {:.2}", order.unit_price)?;
            writeln!(out, "Total:      {:.2}", order_total(order)?)?;
            writeln!(out, "Created:    {}", order.created_at.format(TIMESTAMP_FORMAT))?;
        }
        EngineCommand::CancelOrder { order_id } => {
            let order = engine.cancel_order(&order_id)?;
            writeln!(
                out,
                "Order {} cancelled, {} returned to stock of {}",
                order.id, order.quantity, order.product_id
            )?;
        }
        EngineCommand::Statistics => {
            let statistics = engine.order_statistics()?;
            write_statistics_csv(&statistics, out).map_err(CliError::Report)?;
        }
        EngineCommand::ModifyAccount {
            old_id,
            new_id,
            new_password,
        } => {
            engine.modify_account(&old_id, &new_id, &new_password)?;
            writeln!(out, "Account {} updated", new_id.trim())?;
        }
        EngineCommand::Backup => {
            engine.backup()?;
            writeln!(out, "Backup written")?;
        }
        EngineCommand::Restore => {
            engine.restore()?;
            writeln!(out, "Data restored from backup")?;
        }
        EngineCommand::Logs { keyword } => {
            for line in engine.recent_logs(keyword.as_deref())? {
                writeln!(out, "{}", line)?;
            }
        }
        EngineCommand::ClearLogs => {
            engine.clear_logs()?;
            writeln!(out, "Audit log cleared")?;
        }
    }

    Ok(())
}

fn order_total(order: &Order) -> Result<Decimal, EngineError> {
    order
        .total()
        .ok_or_else(|| EngineError::amount_overflow(&order.product_id))
}

/// Read shell commands from `input` until `exit` or end of input
///
/// Operation failures are reported and the loop continues. Leaving the
/// shell saves and backs up the data.
pub fn run_shell<S, A, C>(
    engine: &mut InventoryEngine<S, A, C>,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError>
where
    S: SnapshotStore,
    A: AuditSink,
    C: Clock,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{}", e)?;
                continue;
            }
        };

        let result = match command {
            ShellCommand::Exit => break,
            ShellCommand::Login { user, password } => match engine.authenticate(&user, &password) {
                Ok(()) => writeln!(out, "Logged in as {}", user).map_err(CliError::from),
                Err(e) => Err(e.into()),
            },
            ShellCommand::Logout => {
                engine.logout();
                writeln!(out, "Logged out").map_err(CliError::from)
            }
            ShellCommand::Run(command) => execute(engine, command, out),
        };

        match result {
            Err(CliError::Io(e)) => return Err(CliError::Io(e)),
            Err(e) => writeln!(out, "Error: {}", e)?,
            Ok(()) => {}
        }
    }

    engine.shutdown()?;
    info!("Shell closed, data saved and backed up");
    writeln!(out, "Data saved and backed up")?;

    Ok(())
}
