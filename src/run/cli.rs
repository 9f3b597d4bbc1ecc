use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::api::{Backend, MockBackend, Request, Response};
use crate::config::Settings;
use crate::db::Database;
use crate::models::Transaction;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], settings: &Settings) -> Result<()> {
    match args[1].as_str() {
        "employees" => cli_employees(settings),
        "transactions" | "t" => cli_transactions(&args[2..], settings),
        "import" => cli_import(&args[2..], settings),
        "export" => cli_export(&args[2..], settings),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("emptui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("EmpTUI - employee transaction viewer");
    println!();
    println!("Usage: emptui [options] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  employees                     List employees");
    println!("  transactions                  Print one page of transactions");
    println!("    --page <n>                  Page to print (default: 0)");
    println!("    --employee <id>             Every transaction for one employee instead");
    println!("  import <file.csv>             Import transactions from CSV");
    println!("                                (columns: id,employee_id,merchant,amount,date,approved)");
    println!("  export [path]                 Export all transactions to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --db <path>                   Database file (env: EMPTUI_DB)");
    println!("  --page-size <n>               Transactions per page (default: 5)");
    println!("  --latency-ms <n>              Simulated request latency in the TUI (default: 500)");
}

fn cli_employees(settings: &Settings) -> Result<()> {
    let db = Database::open(&settings.db_path)?;
    let employees = db.get_employees()?;
    if employees.is_empty() {
        println!("No employees");
        return Ok(());
    }

    println!("{:<12} Name", "ID");
    println!("{}", "─".repeat(40));
    for e in &employees {
        println!("{:<12} {}", e.id, e.full_name());
    }
    Ok(())
}

/// Build the backend request for `transactions` from its flags.
fn transactions_request(args: &[String]) -> Result<Request> {
    let flag = |name: &str| {
        args.windows(2)
            .find(|w| w[0] == name)
            .map(|w| w[1].clone())
    };

    if let Some(employee_id) = flag("--employee") {
        return Ok(Request::TransactionsByEmployee { employee_id });
    }
    let page = flag("--page")
        .map(|p| p.parse::<u32>().with_context(|| format!("Invalid --page: {p}")))
        .transpose()?
        .unwrap_or(0);
    Ok(Request::PaginatedTransactions { page: Some(page) })
}

fn cli_transactions(args: &[String], settings: &Settings) -> Result<()> {
    let request = transactions_request(args)?;
    let db = Database::open(&settings.db_path)?;
    let mut backend = MockBackend::new(db, settings.page_size, Duration::ZERO);

    let (txns, next_page) = match backend.call(&request)? {
        Response::TransactionsPage(page) => (page.data, page.next_page),
        Response::Transactions(txns) => (txns, None),
        _ => anyhow::bail!("Unexpected response for {}", request.endpoint()),
    };

    print_transactions(&txns);
    if let Some(next) = next_page {
        println!();
        println!("More available: emptui transactions --page {next}");
    }
    Ok(())
}

fn print_transactions(txns: &[Transaction]) {
    if txns.is_empty() {
        println!("No transactions");
        return;
    }

    println!(
        "{:<10} {:<12} {:<20} {:<22} {:>12}  Approved",
        "ID", "Date", "Employee", "Merchant", "Amount"
    );
    println!("{}", "─".repeat(90));
    for t in txns {
        println!(
            "{:<10} {:<12} {:<20} {:<22} {:>12}  {}",
            t.id,
            t.date.to_string(),
            t.employee.full_name(),
            t.merchant,
            format_amount(t.amount),
            if t.approved { "yes" } else { "no" },
        );
    }
    let spent: rust_decimal::Decimal = txns.iter().map(Transaction::abs_amount).sum();
    println!("{}", "─".repeat(90));
    println!("{} transactions, {} total", txns.len(), format_amount(spent));
}

fn cli_import(args: &[String], settings: &Settings) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: emptui import <file.csv>");
    }

    let file_path = shellexpand(&args[0]);
    let path = Path::new(&file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let mut db = Database::open(&settings.db_path)?;
    let txns = crate::import::CsvImporter::read(path, &db)?;
    println!("Parsed {} transactions", txns.len());

    let count = db.insert_transactions_batch(&txns)?;
    let dupes = txns.len() - count;
    tracing::info!(file = %file_path, count, dupes, "csv import");
    println!("Imported {count} new transactions ({dupes} duplicates skipped)");
    Ok(())
}

fn cli_export(args: &[String], settings: &Settings) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let today = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/emptui-export-{today}.csv")
        });

    let db = Database::open(&settings.db_path)?;
    let count = db.export_to_csv(&output_path)?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transactions_request_defaults_to_first_page() {
        assert_eq!(
            transactions_request(&[]).unwrap(),
            Request::PaginatedTransactions { page: Some(0) }
        );
        assert_eq!(
            transactions_request(&args(&["--page", "3"])).unwrap(),
            Request::PaginatedTransactions { page: Some(3) }
        );
    }

    #[test]
    fn test_transactions_request_employee_wins() {
        assert_eq!(
            transactions_request(&args(&["--page", "3", "--employee", "emp-2"])).unwrap(),
            Request::TransactionsByEmployee {
                employee_id: "emp-2".into()
            }
        );
    }

    #[test]
    fn test_transactions_request_bad_page() {
        assert!(transactions_request(&args(&["--page", "-1"])).is_err());
    }

    #[test]
    fn test_shellexpand() {
        assert_eq!(shellexpand("/abs/path.csv"), "/abs/path.csv");
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        assert_eq!(shellexpand("~/out.csv"), format!("{home}/out.csv"));
    }
}
