mod schema;
mod seed;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const TRANSACTION_COLUMNS: &str =
    "t.id, t.amount, t.merchant, t.date, t.approved, e.id, e.first_name, e.last_name";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_demo_data()?;
        Ok(db)
    }

    /// Empty, unseeded database for tests.
    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Populate the demo ledger on first run. Returns the number of transactions inserted.
    pub(crate) fn seed_demo_data(&mut self) -> Result<usize> {
        if self.get_employee_count()? > 0 {
            return Ok(0);
        }

        let employees = seed::demo_employees();
        let txns = seed::demo_transactions(&employees);

        for emp in &employees {
            self.insert_employee(emp)?;
        }

        let count = self.insert_transactions_batch(&txns)?;
        tracing::info!(employees = employees.len(), transactions = count, "seeded demo data");
        Ok(count)
    }

    // ── Employees ─────────────────────────────────────────────

    pub(crate) fn insert_employee(&self, employee: &Employee) -> Result<()> {
        self.conn.execute(
            "INSERT INTO employees (id, first_name, last_name) VALUES (?1, ?2, ?3)",
            params![employee.id, employee.first_name, employee.last_name],
        )?;
        Ok(())
    }

    pub(crate) fn get_employees(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name FROM employees ORDER BY first_name, last_name, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Employee {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_employee_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let result = self.conn.query_row(
            "SELECT id, first_name, last_name FROM employees WHERE id = ?1",
            params![id],
            |row| {
                Ok(Employee {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            },
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_employee_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Insert transactions, skipping ids that already exist. Returns the number inserted.
    pub(crate) fn insert_transactions_batch(&mut self, txns: &[Transaction]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut count = 0;
        for txn in txns {
            count += tx.execute(
                "INSERT OR IGNORE INTO transactions (id, employee_id, merchant, amount, date, approved)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    txn.id,
                    txn.employee.id,
                    txn.merchant,
                    txn.amount.to_string(),
                    txn.date.format(DATE_FORMAT).to_string(),
                    txn.approved,
                ],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    /// Transactions newest first, optionally scoped to one employee.
    pub(crate) fn get_transactions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        employee_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = format!(
            "SELECT {TRANSACTION_COLUMNS}
             FROM transactions t JOIN employees e ON e.id = t.employee_id WHERE 1=1"
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(eid) = employee_id {
            sql.push_str(&format!(" AND t.employee_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(eid.to_string()));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id ASC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
            if let Some(o) = offset {
                sql.push_str(&format!(" OFFSET {o}"));
            }
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_by_id(&self, id: &str) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {TRANSACTION_COLUMNS}
                 FROM transactions t JOIN employees e ON e.id = t.employee_id WHERE t.id = ?1"
            ),
            params![id],
            transaction_from_row,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// Returns false when no transaction has the given id.
    pub(crate) fn set_transaction_approval(&self, id: &str, approved: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET approved = ?1 WHERE id = ?2",
            params![approved, id],
        )?;
        Ok(changed > 0)
    }

    // ── Export ────────────────────────────────────────────────

    pub(crate) fn export_to_csv(&self, path: &str) -> Result<usize> {
        let txns = self.get_transactions(None, None, None)?;
        if txns.is_empty() {
            return Ok(0);
        }

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record(["id", "employee_id", "employee", "merchant", "amount", "date", "approved"])?;
        for txn in &txns {
            wtr.write_record([
                txn.id.as_str(),
                txn.employee.id.as_str(),
                &txn.employee.full_name(),
                txn.merchant.as_str(),
                &txn.amount.to_string(),
                &txn.date.format(DATE_FORMAT).to_string(),
                if txn.approved { "true" } else { "false" },
            ])?;
        }
        wtr.flush()?;
        Ok(txns.len())
    }
}

fn transaction_from_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(1)?;
    let date_str: String = row.get(3)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Transaction {
        id: row.get(0)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        merchant: row.get(2)?,
        date,
        approved: row.get(4)?,
        employee: Employee {
            id: row.get(5)?,
            first_name: row.get(6)?,
            last_name: row.get(7)?,
        },
    })
}

#[cfg(test)]
mod tests;
