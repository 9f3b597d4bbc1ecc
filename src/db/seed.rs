use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Employee, Transaction};

const EMPLOYEES: &[(&str, &str, &str)] = &[
    ("emp-001", "James", "Smith"),
    ("emp-002", "Mary", "Johnson"),
    ("emp-003", "Robert", "Garcia"),
    ("emp-004", "Patricia", "Miller"),
    ("emp-005", "Linda", "Davis"),
];

const MERCHANTS: &[&str] = &[
    "Social Media Ads Inc",
    "Cloud Hosting Co",
    "Office Supplies Depot",
    "Airline Travel",
    "Downtown Deli",
    "Conference Tickets",
    "Software Licenses LLC",
    "Rideshare",
];

const DEMO_TRANSACTION_COUNT: u64 = 36;

pub(crate) fn demo_employees() -> Vec<Employee> {
    EMPLOYEES
        .iter()
        .map(|(id, first, last)| Employee::new((*id).into(), (*first).into(), (*last).into()))
        .collect()
}

/// Deterministic demo ledger: every employee gets a spread of merchants and dates.
pub(crate) fn demo_transactions(employees: &[Employee]) -> Vec<Transaction> {
    let Some(start) = NaiveDate::from_ymd_opt(2024, 1, 2) else {
        return Vec::new();
    };
    if employees.is_empty() {
        return Vec::new();
    }

    (0..DEMO_TRANSACTION_COUNT)
        .map(|i| {
            let idx = i as usize;
            let employee = employees[idx % employees.len()].clone();
            let merchant = MERCHANTS[(idx * 3) % MERCHANTS.len()].to_string();
            let cents = ((i * 37_919) % 180_000 + 499) as i64;
            Transaction {
                id: format!("txn-{:03}", i + 1),
                amount: Decimal::new(cents, 2),
                employee,
                merchant,
                date: start.checked_add_days(Days::new(i * 4)).unwrap_or(start),
                approved: i % 3 == 0,
            }
        })
        .collect()
}
