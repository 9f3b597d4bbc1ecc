#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::worker::Worker;
use super::*;
use crate::db::Database;

fn seeded_db(txn_count: usize) -> Database {
    let mut db = Database::open_in_memory().unwrap();
    let alice = Employee::new("e1".into(), "Alice".into(), "Smith".into());
    let bob = Employee::new("e2".into(), "Bob".into(), "Jones".into());
    db.insert_employee(&alice).unwrap();
    db.insert_employee(&bob).unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let txns: Vec<Transaction> = (0..txn_count)
        .map(|i| Transaction {
            id: format!("t{i}"),
            amount: dec!(12.50),
            employee: if i % 2 == 0 { alice.clone() } else { bob.clone() },
            merchant: "Shop".into(),
            date: start - chrono::Days::new(i as u64),
            approved: false,
        })
        .collect();
    db.insert_transactions_batch(&txns).unwrap();
    db
}

fn backend(txn_count: usize, page_size: u32) -> MockBackend {
    MockBackend::new(seeded_db(txn_count), page_size, Duration::ZERO)
}

fn page(backend: &mut impl Backend, page: u32) -> PaginatedResponse<Vec<Transaction>> {
    match backend
        .call(&Request::PaginatedTransactions { page: Some(page) })
        .unwrap()
    {
        Response::TransactionsPage(p) => p,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn ids(txns: &[Transaction]) -> Vec<&str> {
    txns.iter().map(|t| t.id.as_str()).collect()
}

/// Records every request that reaches the wrapped backend.
struct Recording<B> {
    inner: B,
    log: Arc<Mutex<Vec<Request>>>,
}

impl<B: Backend> Backend for Recording<B> {
    fn call(&mut self, request: &Request) -> Result<Response, FetchError> {
        self.log.lock().unwrap().push(request.clone());
        self.inner.call(request)
    }
}

fn recorded(inner: MockBackend) -> (CachedBackend<Recording<MockBackend>>, Arc<Mutex<Vec<Request>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let backend = CachedBackend::new(Recording {
        inner,
        log: Arc::clone(&log),
    });
    (backend, log)
}

// ── Request keys ──────────────────────────────────────────────

#[test]
fn test_cache_keys_include_params() {
    assert_eq!(Request::Employees.cache_key(), "employees");
    assert_eq!(
        Request::PaginatedTransactions { page: Some(3) }.cache_key(),
        "paginatedTransactions{\"page\":3}"
    );
    assert_eq!(
        Request::TransactionsByEmployee {
            employee_id: "e1".into()
        }
        .cache_key(),
        "transactionsByEmployee{\"employeeId\":\"e1\"}"
    );
}

#[test]
fn test_only_approval_is_a_write() {
    assert!(Request::Employees.is_read());
    assert!(Request::PaginatedTransactions { page: Some(0) }.is_read());
    assert!(!Request::SetTransactionApproval {
        transaction_id: "t1".into(),
        value: true
    }
    .is_read());
}

// ── Mock backend ──────────────────────────────────────────────

#[test]
fn test_employees() {
    let mut backend = backend(0, 5);
    match backend.call(&Request::Employees).unwrap() {
        Response::Employees(list) => assert_eq!(list.len(), 2),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_pagination_walks_to_exhaustion() {
    let mut backend = backend(12, 5);

    let first = page(&mut backend, 0);
    assert_eq!(ids(&first.data), vec!["t0", "t1", "t2", "t3", "t4"]);
    assert_eq!(first.next_page, Some(1));

    let second = page(&mut backend, 1);
    assert_eq!(second.data.len(), 5);
    assert_eq!(second.next_page, Some(2));

    let last = page(&mut backend, 2);
    assert_eq!(ids(&last.data), vec!["t10", "t11"]);
    assert_eq!(last.next_page, None);
}

#[test]
fn test_exact_multiple_has_no_next_page() {
    let mut backend = backend(10, 5);
    assert_eq!(page(&mut backend, 1).next_page, None);
}

#[test]
fn test_null_page_rejected() {
    let mut backend = backend(3, 5);
    let err = backend
        .call(&Request::PaginatedTransactions { page: None })
        .unwrap_err();
    assert_eq!(err, FetchError::InvalidRequest("Page cannot be null".into()));
}

#[test]
fn test_page_past_end_rejected() {
    let mut backend = backend(3, 2);
    let err = backend
        .call(&Request::PaginatedTransactions { page: Some(5) })
        .unwrap_err();
    assert_eq!(err, FetchError::InvalidRequest("Invalid page".into()));
}

#[test]
fn test_zero_page_size_clamped() {
    let mut backend = backend(3, 0);
    assert_eq!(page(&mut backend, 0).data.len(), 1);
}

#[test]
fn test_transactions_by_employee() {
    let mut backend = backend(6, 5);
    let resp = backend
        .call(&Request::TransactionsByEmployee {
            employee_id: "e2".into(),
        })
        .unwrap();
    match resp {
        Response::Transactions(list) => assert_eq!(ids(&list), vec!["t1", "t3", "t5"]),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_empty_employee_id_rejected() {
    let mut backend = backend(2, 5);
    let err = backend
        .call(&Request::TransactionsByEmployee {
            employee_id: String::new(),
        })
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::InvalidRequest("Employee id cannot be empty".into())
    );
}

#[test]
fn test_set_approval() {
    let mut backend = backend(2, 5);
    let resp = backend
        .call(&Request::SetTransactionApproval {
            transaction_id: "t1".into(),
            value: true,
        })
        .unwrap();
    assert_eq!(
        resp,
        Response::ApprovalSet {
            transaction_id: "t1".into(),
            value: true
        }
    );
    assert!(page(&mut backend, 0).data.iter().any(|t| t.id == "t1" && t.approved));
}

#[test]
fn test_set_approval_unknown_transaction() {
    let mut backend = backend(2, 5);
    let err = backend
        .call(&Request::SetTransactionApproval {
            transaction_id: "nope".into(),
            value: true,
        })
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::InvalidRequest("Invalid transaction to update".into())
    );
}

// ── Cache ─────────────────────────────────────────────────────

#[test]
fn test_cache_hit_skips_backend() {
    let (mut backend, log) = recorded(self::backend(4, 2));
    let a = page(&mut backend, 0);
    let b = page(&mut backend, 0);
    assert_eq!(a, b);
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(backend.cached_len(), 1);
}

#[test]
fn test_errors_are_not_cached() {
    let (mut backend, log) = recorded(self::backend(1, 2));
    let req = Request::PaginatedTransactions { page: Some(9) };
    assert!(backend.call(&req).is_err());
    assert!(backend.call(&req).is_err());
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(backend.cached_len(), 0);
}

#[test]
fn test_fetch_without_cache_always_calls() {
    let (mut backend, log) = recorded(self::backend(1, 2));
    backend.fetch_without_cache(&Request::Employees).unwrap();
    backend.fetch_without_cache(&Request::Employees).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(backend.cached_len(), 0);
}

#[test]
fn test_approval_clears_transaction_endpoints_only() {
    let (mut backend, log) = recorded(self::backend(4, 2));
    backend.call(&Request::Employees).unwrap();
    page(&mut backend, 0);
    backend
        .call(&Request::TransactionsByEmployee {
            employee_id: "e1".into(),
        })
        .unwrap();
    assert_eq!(backend.cached_len(), 3);

    backend
        .call(&Request::SetTransactionApproval {
            transaction_id: "t0".into(),
            value: true,
        })
        .unwrap();
    assert_eq!(backend.cached_len(), 1);

    // Fresh read reflects the approval.
    assert!(page(&mut backend, 0).data[0].approved);
    assert_eq!(log.lock().unwrap().len(), 5);
}

#[test]
fn test_clear_cache() {
    let (mut backend, _log) = recorded(self::backend(4, 2));
    backend.call(&Request::Employees).unwrap();
    page(&mut backend, 1);
    backend.clear_cache();
    assert_eq!(backend.cached_len(), 0);
}

#[test]
fn test_clear_cache_by_endpoint() {
    let (mut backend, _log) = recorded(self::backend(4, 2));
    backend.call(&Request::Employees).unwrap();
    page(&mut backend, 0);
    page(&mut backend, 1);
    backend.clear_cache_by_endpoint(&[Endpoint::PaginatedTransactions]);
    assert_eq!(backend.cached_len(), 1);
}

// ── Worker ────────────────────────────────────────────────────

#[test]
fn test_worker_answers_in_order_with_tags() {
    let worker: Worker<u32> = Worker::spawn(backend(3, 5)).unwrap();
    worker.submit(1, Request::Employees).unwrap();
    worker
        .submit(2, Request::PaginatedTransactions { page: None })
        .unwrap();

    let first = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(first.tag, 1);
    assert!(matches!(first.result, Ok(Response::Employees(_))));

    let second = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(second.tag, 2);
    assert!(second.result.is_err());

    assert!(worker.try_recv().unwrap().is_none());
}
