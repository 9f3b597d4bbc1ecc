use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::db::{Database, DATE_FORMAT};
use crate::models::{Employee, Transaction};

const REQUIRED_COLUMNS: [&str; 6] = ["id", "employee_id", "merchant", "amount", "date", "approved"];

/// Column positions, found by header name so the file may order them freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    id: usize,
    employee_id: usize,
    merchant: usize,
    amount: usize,
    date: usize,
    approved: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .with_context(|| {
                    format!(
                        "Missing column '{name}' (expected: {})",
                        REQUIRED_COLUMNS.join(",")
                    )
                })
        };
        Ok(Self {
            id: find("id")?,
            employee_id: find("employee_id")?,
            merchant: find("merchant")?,
            amount: find("amount")?,
            date: find("date")?,
            approved: find("approved")?,
        })
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read a transactions CSV, resolving each row's employee against `db`.
    pub(crate) fn read(path: &Path, db: &Database) -> Result<Vec<Transaction>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let columns = Columns::from_headers(rdr.headers().context("Failed to read CSV header")?)?;

        let mut employees: HashMap<String, Employee> = HashMap::new();
        let mut transactions = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let record = result.with_context(|| format!("Line {line}: failed to read record"))?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let field = |idx: usize| record.get(idx).unwrap_or("");
            let employee_id = field(columns.employee_id);

            let employee = match employees.get(employee_id) {
                Some(e) => e.clone(),
                None => {
                    let found = db
                        .get_employee_by_id(employee_id)?
                        .with_context(|| format!("Line {line}: unknown employee '{employee_id}'"))?;
                    employees.insert(employee_id.to_string(), found.clone());
                    found
                }
            };

            transactions.push(
                parse_row(&record, &columns, employee)
                    .with_context(|| format!("Line {line}: invalid transaction"))?,
            );
        }

        Ok(transactions)
    }
}

fn parse_row(record: &csv::StringRecord, columns: &Columns, employee: Employee) -> Result<Transaction> {
    let field = |idx: usize| record.get(idx).unwrap_or("");
    let id = field(columns.id);
    if id.is_empty() {
        anyhow::bail!("Transaction id cannot be empty");
    }
    Ok(Transaction {
        id: id.to_string(),
        amount: parse_decimal(field(columns.amount))?,
        employee,
        merchant: field(columns.merchant).to_string(),
        date: parse_date(field(columns.date))?,
        approved: parse_bool(field(columns.approved))?,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in [DATE_FORMAT, "%m/%d/%Y", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: '{s}'")
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        anyhow::bail!("Amount cannot be empty");
    }
    Decimal::from_str(&cleaned).with_context(|| format!("Failed to parse '{s}' as decimal"))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => anyhow::bail!("Could not parse approved flag: '{other}'"),
    }
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
