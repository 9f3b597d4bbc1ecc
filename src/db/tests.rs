#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn employee(id: &str, first: &str, last: &str) -> Employee {
    Employee::new(id.into(), first.into(), last.into())
}

fn txn(id: &str, emp: &Employee, amount: Decimal, date: &str) -> Transaction {
    Transaction {
        id: id.into(),
        amount,
        employee: emp.clone(),
        merchant: format!("Merchant {id}"),
        date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
        approved: false,
    }
}

fn setup_test_data(db: &mut Database) -> (Employee, Employee) {
    let alice = employee("e1", "Alice", "Smith");
    let bob = employee("e2", "Bob", "Jones");
    db.insert_employee(&alice).unwrap();
    db.insert_employee(&bob).unwrap();

    let txns = vec![
        txn("t1", &alice, dec!(10.00), "2024-03-01"),
        txn("t2", &bob, dec!(20.50), "2024-02-15"),
        txn("t3", &alice, dec!(5.25), "2024-02-01"),
        txn("t4", &bob, dec!(99.99), "2024-01-20"),
    ];
    db.insert_transactions_batch(&txns).unwrap();
    (alice, bob)
}

// ── Seeding ───────────────────────────────────────────────────

#[test]
fn test_in_memory_starts_empty() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_employee_count().unwrap(), 0);
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_seed_demo_data() {
    let mut db = Database::open_in_memory().unwrap();
    let inserted = db.seed_demo_data().unwrap();
    assert!(inserted > 0);
    assert_eq!(db.get_transaction_count().unwrap() as usize, inserted);
    assert!(db.get_employee_count().unwrap() > 1);
}

#[test]
fn test_seed_demo_data_not_reseeded() {
    let mut db = Database::open_in_memory().unwrap();
    db.seed_demo_data().unwrap();
    let before = db.get_transaction_count().unwrap();
    assert_eq!(db.seed_demo_data().unwrap(), 0);
    assert_eq!(db.get_transaction_count().unwrap(), before);
}

#[test]
fn test_open_file_seeds_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emptui.db");
    let first = Database::open(&path).unwrap().get_transaction_count().unwrap();
    let second = Database::open(&path).unwrap().get_transaction_count().unwrap();
    assert!(first > 0);
    assert_eq!(first, second);
}

// ── Employees ─────────────────────────────────────────────────

#[test]
fn test_employees_sorted_by_name() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let names: Vec<String> = db
        .get_employees()
        .unwrap()
        .iter()
        .map(|e| e.full_name())
        .collect();
    assert_eq!(names, vec!["Alice Smith", "Bob Jones"]);
}

#[test]
fn test_employee_by_id() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    assert_eq!(db.get_employee_by_id("e2").unwrap().unwrap().first_name, "Bob");
    assert!(db.get_employee_by_id("nope").unwrap().is_none());
}

#[test]
fn test_duplicate_employee_rejected() {
    let db = Database::open_in_memory().unwrap();
    let alice = employee("e1", "Alice", "Smith");
    db.insert_employee(&alice).unwrap();
    assert!(db.insert_employee(&alice).is_err());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transactions_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let ids: Vec<String> = db
        .get_transactions(None, None, None)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4"]);
}

#[test]
fn test_transactions_limit_offset() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let page: Vec<String> = db
        .get_transactions(Some(2), Some(2), None)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(page, vec!["t3", "t4"]);
    assert!(db.get_transactions(Some(2), Some(10), None).unwrap().is_empty());
}

#[test]
fn test_transactions_by_employee() {
    let mut db = Database::open_in_memory().unwrap();
    let (alice, _) = setup_test_data(&mut db);
    let txns = db.get_transactions(None, None, Some(&alice.id)).unwrap();
    assert_eq!(txns.len(), 2);
    assert!(txns.iter().all(|t| t.employee == alice));
}

#[test]
fn test_transaction_roundtrip_fields() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let t = db.get_transaction_by_id("t2").unwrap().unwrap();
    assert_eq!(t.amount, dec!(20.50));
    assert_eq!(t.employee.last_name, "Jones");
    assert_eq!(t.date.format(DATE_FORMAT).to_string(), "2024-02-15");
    assert!(!t.approved);
}

#[test]
fn test_batch_skips_existing_ids() {
    let mut db = Database::open_in_memory().unwrap();
    let (alice, _) = setup_test_data(&mut db);
    let again = vec![
        txn("t1", &alice, dec!(1), "2024-01-01"),
        txn("t9", &alice, dec!(2), "2024-01-02"),
    ];
    assert_eq!(db.insert_transactions_batch(&again).unwrap(), 1);
    assert_eq!(db.get_transaction_count().unwrap(), 5);
}

#[test]
fn test_transaction_requires_known_employee() {
    let mut db = Database::open_in_memory().unwrap();
    let ghost = employee("ghost", "No", "One");
    assert!(db
        .insert_transactions_batch(&[txn("t1", &ghost, dec!(1), "2024-01-01")])
        .is_err());
}

#[test]
fn test_set_transaction_approval() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    assert!(db.set_transaction_approval("t3", true).unwrap());
    assert!(db.get_transaction_by_id("t3").unwrap().unwrap().approved);
    assert!(db.set_transaction_approval("t3", false).unwrap());
    assert!(!db.get_transaction_by_id("t3").unwrap().unwrap().approved);
}

#[test]
fn test_set_approval_unknown_id() {
    let db = Database::open_in_memory().unwrap();
    assert!(!db.set_transaction_approval("missing", true).unwrap());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let count = db.export_to_csv(path.to_str().unwrap()).unwrap();
    assert_eq!(count, 4);

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,employee_id,employee,merchant,amount,date,approved"
    );
    assert_eq!(
        lines.next().unwrap(),
        "t1,e1,Alice Smith,Merchant t1,10.00,2024-03-01,false"
    );
}

#[test]
fn test_export_empty_writes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    assert_eq!(db.export_to_csv(path.to_str().unwrap()).unwrap(), 0);
    assert!(!path.exists());
}
