#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn make_employee(id: &str, first: &str, last: &str) -> Employee {
    Employee::new(id.into(), first.into(), last.into())
}

fn make_txn(amount: Decimal) -> Transaction {
    Transaction {
        id: "t1".into(),
        amount,
        employee: make_employee("e1", "Alice", "Smith"),
        merchant: "Coffee Bar".into(),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        approved: false,
    }
}

// ── Employee ──────────────────────────────────────────────────

#[test]
fn test_empty_employee_sentinel() {
    let all = Employee::empty();
    assert!(all.is_empty());
    assert_eq!(all.id, "");
    assert_eq!(all.full_name(), "All Employees");
}

#[test]
fn test_real_employee_not_empty() {
    assert!(!make_employee("e1", "Alice", "Smith").is_empty());
}

#[test]
fn test_employee_display() {
    let emp = make_employee("e1", "Alice", "Smith");
    assert_eq!(format!("{emp}"), "Alice Smith");
}

#[test]
fn test_find_by_name_case_insensitive() {
    let employees = vec![
        make_employee("e1", "Alice", "Smith"),
        make_employee("e2", "Bob", "Jones"),
    ];
    let found = Employee::find_by_name(&employees, "JONES").unwrap();
    assert_eq!(found.id, "e2");
    assert_eq!(Employee::find_by_name(&employees, "ali").unwrap().id, "e1");
}

#[test]
fn test_find_by_name_blank_query() {
    let employees = vec![make_employee("e1", "Alice", "Smith")];
    assert!(Employee::find_by_name(&employees, "   ").is_none());
    assert!(Employee::find_by_name(&employees, "zed").is_none());
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(Decimal::ZERO).abs_amount(), Decimal::ZERO);
}

// ── PaginatedResponse ─────────────────────────────────────────

#[test]
fn test_paginated_exhausted() {
    let last: PaginatedResponse<Vec<Transaction>> = PaginatedResponse {
        data: vec![make_txn(dec!(1))],
        next_page: None,
    };
    assert!(last.is_exhausted());

    let more = PaginatedResponse {
        data: Vec::<Transaction>::new(),
        next_page: Some(2),
    };
    assert!(!more.is_exhausted());
}
