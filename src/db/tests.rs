#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use std::time::Duration;
use tempfile::TempDir;

use super::*;

fn open_temp() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("ledger.db"), Duration::from_millis(500));
    db.initialize().unwrap();
    (dir, db)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn txn(d: &str, kind: TransactionType, amount: i64, category: &str, desc: &str) -> NewTransaction {
    NewTransaction::new(date(d), kind, amount, category, desc)
}

fn setup_test_data(db: &Database) {
    let txns = vec![
        txn("2024-05-01", TransactionType::Expense, 1000, "Food & Drinks", "Snacks"),
        txn("2024-05-01", TransactionType::Expense, 2000, "Supplies", "Markers"),
        txn("2024-05-02", TransactionType::Income, 5000, "Membership Dues", "May dues"),
        txn("2024-05-20", TransactionType::Expense, 3000, "Food & Drinks", "Pizza night"),
        txn("2024-06-03", TransactionType::Expense, 7000, "Venue Rental", "Hall"),
    ];
    for t in &txns {
        db.insert_transaction(t).unwrap();
    }
}

// ── Setup ─────────────────────────────────────────────────────

#[test]
fn test_initialize_creates_tables() {
    let (_dir, db) = open_temp();
    let diag = db.diagnostics(3).unwrap();
    assert!(diag.tables.contains(&"transactions".to_string()));
    assert!(diag.tables.contains(&"categories".to_string()));
    assert!(diag.tables.contains(&"schema_version".to_string()));
    assert_eq!(diag.transaction_count, 0);
    assert!(diag.recent.is_empty());
}

#[test]
fn test_initialize_is_idempotent() {
    let (_dir, db) = open_temp();
    let before = db.list_categories(None).unwrap().len();
    db.initialize().unwrap();
    let after = db.list_categories(None).unwrap().len();
    assert_eq!(before, after);
}

#[test]
fn test_initialize_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(
        dir.path().join("nested").join("ledger.db"),
        Duration::from_millis(500),
    );
    db.initialize().unwrap();
    assert!(db.path().exists());
}

#[test]
fn test_missing_database_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("absent.db"), Duration::from_millis(500));
    let err = db.list_transactions(10, None).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }), "got {err:?}");
    // The operation must not create the file as a side effect.
    assert!(!db.path().exists());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_insert_and_list() {
    let (_dir, db) = open_temp();
    let t = txn("2024-05-01", TransactionType::Income, 5000, "Sponsorship", "Local cafe");
    let id = db.insert_transaction(&t).unwrap();
    assert!(id > 0);

    let listed = db.list_transactions(100, None).unwrap();
    assert_eq!(listed.len(), 1);
    let row = &listed[0];
    assert_eq!(row.id, id);
    assert_eq!(row.date, t.date);
    assert_eq!(row.kind, TransactionType::Income);
    assert_eq!(row.amount, 5000);
    assert_eq!(row.category, "Sponsorship");
    assert_eq!(row.description, "Local cafe");
}

#[test]
fn test_insert_rejects_non_positive_amount() {
    let (_dir, db) = open_temp();
    let t = txn("2024-05-01", TransactionType::Expense, 0, "Supplies", "Nothing");
    assert!(matches!(db.insert_transaction(&t), Err(Error::Sql(_))));
}

#[test]
fn test_list_ordering_newest_date_first() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let txns = db.list_transactions(100, None).unwrap();
    assert_eq!(txns.len(), 5);
    for window in txns.windows(2) {
        assert!(window[0].date >= window[1].date);
    }
}

#[test]
fn test_list_same_date_latest_created_first() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let txns = db.list_transactions(100, None).unwrap();
    let may_first: Vec<&str> = txns
        .iter()
        .filter(|t| t.date == date("2024-05-01"))
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(may_first, vec!["Markers", "Snacks"]);
}

#[test]
fn test_list_limit() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let limited = db.list_transactions(2, None).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].description, "Hall");
}

#[test]
fn test_list_type_filter() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let income = db.list_transactions(100, Some(TransactionType::Income)).unwrap();
    assert_eq!(income.len(), 1);
    assert!(income.iter().all(|t| t.is_income()));

    let expense = db.list_transactions(100, Some(TransactionType::Expense)).unwrap();
    assert_eq!(expense.len(), 4);
}

#[test]
fn test_is_duplicate_exact_match_only() {
    let (_dir, db) = open_temp();
    let t = txn("2024-05-01", TransactionType::Expense, 1000, "Food & Drinks", "Snacks");
    assert!(!db.is_duplicate(&t).unwrap());
    db.insert_transaction(&t).unwrap();
    assert!(db.is_duplicate(&t).unwrap());

    let mut other = t.clone();
    other.description = "Snacks ".into();
    assert!(!db.is_duplicate(&other).unwrap());

    let mut other = t.clone();
    other.description = "snacks".into();
    assert!(!db.is_duplicate(&other).unwrap());

    let mut other = t.clone();
    other.kind = TransactionType::Income;
    assert!(!db.is_duplicate(&other).unwrap());

    let mut other = t;
    other.amount = 1001;
    assert!(!db.is_duplicate(&other).unwrap());
}

#[test]
fn test_expense_total_for_month() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    assert_eq!(db.expense_total(month("2024-05")).unwrap(), 6000);
    assert_eq!(db.expense_total(month("2024-06")).unwrap(), 7000);
    assert_eq!(db.expense_total(month("2024-07")).unwrap(), 0);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_categories_filtered_by_type_sorted_by_name() {
    let (_dir, db) = open_temp();
    let cats = db.list_categories(Some(TransactionType::Expense)).unwrap();
    assert!(!cats.is_empty());
    assert!(cats.iter().all(|c| c.kind == TransactionType::Expense));
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_categories_unfiltered_income_first() {
    let (_dir, db) = open_temp();
    let cats = db.list_categories(None).unwrap();
    let first_expense = cats
        .iter()
        .position(|c| c.kind == TransactionType::Expense)
        .unwrap();
    assert!(cats[..first_expense].iter().all(|c| c.kind == TransactionType::Income));
    assert!(cats[first_expense..].iter().all(|c| c.kind == TransactionType::Expense));
}

// ── Analytics ─────────────────────────────────────────────────

#[test]
fn test_monthly_aggregate_groups_by_date_and_type() {
    let (_dir, db) = open_temp();
    db.insert_transaction(&txn("2024-05-01", TransactionType::Expense, 1000, "Supplies", "a"))
        .unwrap();
    db.insert_transaction(&txn("2024-05-01", TransactionType::Expense, 2000, "Supplies", "b"))
        .unwrap();
    db.insert_transaction(&txn("2024-05-02", TransactionType::Income, 5000, "Donations", "c"))
        .unwrap();
    db.insert_transaction(&txn("2024-04-30", TransactionType::Income, 9000, "Donations", "d"))
        .unwrap();

    let rows = db.monthly_aggregate(month("2024-05")).unwrap();
    assert_eq!(
        rows,
        vec![
            AggregateRow {
                date: date("2024-05-01"),
                kind: TransactionType::Expense,
                total: 3000,
            },
            AggregateRow {
                date: date("2024-05-02"),
                kind: TransactionType::Income,
                total: 5000,
            },
        ]
    );
}

#[test]
fn test_monthly_aggregate_empty_month() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);
    assert!(db.monthly_aggregate(month("2023-01")).unwrap().is_empty());
}

#[test]
fn test_category_breakdown_ordering() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let rows = db.category_breakdown(month("2024-05")).unwrap();
    let flat: Vec<(&str, TransactionType, i64)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.kind, r.total))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("Membership Dues", TransactionType::Income, 5000),
            ("Food & Drinks", TransactionType::Expense, 4000),
            ("Supplies", TransactionType::Expense, 2000),
        ]
    );
}

#[test]
fn test_diagnostics_recent_rows() {
    let (_dir, db) = open_temp();
    setup_test_data(&db);

    let diag = db.diagnostics(3).unwrap();
    assert_eq!(diag.transaction_count, 5);
    assert_eq!(diag.recent.len(), 3);
    assert_eq!(diag.recent[0].description, "Hall");
}

#[test]
fn test_initialize_fails_on_empty_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE schema_version (version INTEGER NOT NULL);")
            .unwrap();
    }
    let db = Database::new(path.clone(), Duration::from_millis(500));
    assert!(db.initialize().is_err());
}

