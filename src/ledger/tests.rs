#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use std::time::Duration;
use tempfile::TempDir;

use super::guard::{validate, ValidationError};
use super::*;

const LIMIT: i64 = 200_000;

fn open_temp() -> (TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("ledger.db"), Duration::from_millis(500));
    db.initialize().unwrap();
    (dir, Ledger::new(db, LIMIT))
}

/// A ledger whose database file does not exist, so every storage call fails.
fn unreachable() -> (TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(
        dir.path().join("missing").join("ledger.db"),
        Duration::from_millis(100),
    );
    (dir, Ledger::new(db, LIMIT))
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(d: &str, amount: i64, desc: &str) -> NewTransaction {
    NewTransaction::new(date(d), TransactionType::Expense, amount, "Events", desc)
}

fn income(d: &str, amount: i64, desc: &str) -> NewTransaction {
    NewTransaction::new(date(d), TransactionType::Income, amount, "Membership Dues", desc)
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_validate_rejects_non_positive_amount() {
    assert_eq!(
        validate(&expense("2024-05-01", 0, "Cups")),
        Err(ValidationError::NonPositiveAmount)
    );
    assert_eq!(
        validate(&expense("2024-05-01", -500, "Cups")),
        Err(ValidationError::NonPositiveAmount)
    );
}

#[test]
fn test_validate_rejects_blank_description() {
    assert_eq!(
        validate(&expense("2024-05-01", 500, "   \t\n")),
        Err(ValidationError::EmptyDescription)
    );
    assert_eq!(
        validate(&expense("2024-05-01", 500, "")),
        Err(ValidationError::EmptyDescription)
    );
}

#[test]
fn test_validate_amount_checked_before_description() {
    assert_eq!(
        validate(&expense("2024-05-01", 0, "")),
        Err(ValidationError::NonPositiveAmount)
    );
}

#[test]
fn test_validation_messages() {
    assert_eq!(
        ValidationError::NonPositiveAmount.to_string(),
        "amount must be positive"
    );
    assert_eq!(ValidationError::EmptyDescription.to_string(), "description required");
}

#[test]
fn test_submit_validation_happens_before_storage_access() {
    // Storage is unreachable, so any storage access would yield StorageError.
    let (_dir, ledger) = unreachable();
    assert_eq!(
        ledger.submit(&expense("2024-05-01", 0, "Cups"), false),
        Submission::Invalid(ValidationError::NonPositiveAmount)
    );
    assert_eq!(
        ledger.submit(&income("2024-05-01", 100, "  "), true),
        Submission::Invalid(ValidationError::EmptyDescription)
    );
}

// ── Insert and list ───────────────────────────────────────────

#[test]
fn test_submit_then_list_contains_row_once() {
    let (_dir, ledger) = open_temp();
    let t = income("2024-05-02", 5000, "May dues");
    assert_eq!(ledger.submit(&t, false), Submission::Saved);

    let listed = ledger.list_transactions(100, None);
    assert!(listed.error.is_none());
    let matches = listed
        .data
        .iter()
        .filter(|r| r.date == t.date && r.description == t.description && r.amount == t.amount)
        .count();
    assert_eq!(matches, 1);
}

#[test]
fn test_insert_transaction_reports_success() {
    let (_dir, ledger) = open_temp();
    let result = ledger.insert_transaction(&income("2024-05-02", 5000, "May dues"));
    assert_eq!(result, QueryResult::ok(true));
}

// ── Duplicates ────────────────────────────────────────────────

#[test]
fn test_duplicate_is_rejected() {
    let (_dir, ledger) = open_temp();
    let t = expense("2024-05-01", 1000, "Snacks");

    assert!(!ledger.is_duplicate(&t).data);
    assert!(ledger.submit(&t, false).is_saved());
    assert!(ledger.is_duplicate(&t).data);
    assert_eq!(ledger.submit(&t, false), Submission::Duplicate);
    // Confirmation only overrides the limit warning.
    assert_eq!(ledger.submit(&t, true), Submission::Duplicate);

    assert_eq!(ledger.list_transactions(100, None).data.len(), 1);
}

#[test]
fn test_duplicate_check_is_strict_on_description() {
    let (_dir, ledger) = open_temp();
    ledger.submit(&expense("2024-05-01", 1000, "Snacks"), false);
    assert!(ledger
        .submit(&expense("2024-05-01", 1000, "Snacks "), false)
        .is_saved());
}

// ── Monthly limit ─────────────────────────────────────────────

fn seed_150k(ledger: &Ledger) {
    for (d, amount, desc) in [
        ("2024-05-03", 50_000, "Hall deposit"),
        ("2024-05-10", 70_000, "Speaker fee"),
        ("2024-05-28", 30_000, "Catering"),
    ] {
        assert!(ledger.submit(&expense(d, amount, desc), false).is_saved());
    }
    // Other months and income do not count.
    assert!(ledger.submit(&expense("2024-04-30", 99_000, "April"), false).is_saved());
    assert!(ledger.submit(&income("2024-05-15", 80_000, "Grant"), false).is_saved());
}

#[test]
fn test_check_monthly_limit_exceeded() {
    let (_dir, ledger) = open_temp();
    seed_150k(&ledger);

    let check = ledger.check_monthly_limit(date("2024-05-20"), 60_000);
    assert!(check.error.is_none());
    assert_eq!(
        check.data,
        LimitCheck {
            exceeds: true,
            projected_total: 210_000
        }
    );
}

#[test]
fn test_check_monthly_limit_under() {
    let (_dir, ledger) = open_temp();
    seed_150k(&ledger);

    let check = ledger.check_monthly_limit(date("2024-05-01"), 40_000);
    assert_eq!(
        check.data,
        LimitCheck {
            exceeds: false,
            projected_total: 190_000
        }
    );
}

#[test]
fn test_limit_is_strictly_greater() {
    assert!(!LimitCheck::project(150_000, 50_000, LIMIT).exceeds);
    assert!(LimitCheck::project(150_000, 50_001, LIMIT).exceeds);
}

#[test]
fn test_over_limit_requires_confirmation() {
    let (_dir, ledger) = open_temp();
    seed_150k(&ledger);
    let t = expense("2024-05-20", 60_000, "Banner");

    assert_eq!(
        ledger.submit(&t, false),
        Submission::OverLimit {
            projected_total: 210_000,
            limit: LIMIT
        }
    );
    assert!(!ledger.is_duplicate(&t).data, "warning must not insert");

    assert_eq!(ledger.submit(&t, true), Submission::Saved);
    assert!(ledger.is_duplicate(&t).data);
}

#[test]
fn test_income_skips_limit_check() {
    let (_dir, ledger) = open_temp();
    seed_150k(&ledger);
    assert_eq!(
        ledger.submit(&income("2024-05-20", 500_000, "Big sponsor"), false),
        Submission::Saved
    );
}

#[test]
fn test_configured_limit_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("ledger.db"), Duration::from_millis(500));
    db.initialize().unwrap();
    let ledger = Ledger::new(db, 1_000);

    assert!(matches!(
        ledger.submit(&expense("2024-05-01", 1_001, "Chairs"), false),
        Submission::OverLimit { limit: 1_000, .. }
    ));
}

// ── Categories and aggregates ─────────────────────────────────

#[test]
fn test_list_categories_by_type() {
    let (_dir, ledger) = open_temp();
    let expense_names = ledger.list_categories(Some(TransactionType::Expense)).data;
    let all = ledger.list_categories(None).data;
    let income_names = ledger.list_categories(Some(TransactionType::Income)).data;

    assert!(expense_names.contains(&"Events".to_string()));
    assert!(!expense_names.contains(&"Membership Dues".to_string()));
    assert_eq!(all.len(), expense_names.len() + income_names.len());

    let mut sorted = expense_names.clone();
    sorted.sort();
    assert_eq!(expense_names, sorted);
}

#[test]
fn test_monthly_aggregate_example() {
    let (_dir, ledger) = open_temp();
    ledger.submit(&expense("2024-05-01", 1000, "Cups"), false);
    ledger.submit(&expense("2024-05-01", 2000, "Plates"), false);
    ledger.submit(&income("2024-05-02", 5000, "Dues"), false);

    let month: YearMonth = "2024-05".parse().unwrap();
    let rows = ledger.monthly_aggregate(month).data;
    let flat: Vec<(NaiveDate, TransactionType, i64)> =
        rows.iter().map(|r| (r.date, r.kind, r.total)).collect();
    assert_eq!(
        flat,
        vec![
            (date("2024-05-01"), TransactionType::Expense, 3000),
            (date("2024-05-02"), TransactionType::Income, 5000),
        ]
    );
}

// ── Unreachable storage ───────────────────────────────────────

#[test]
fn test_unreachable_storage_degrades_to_empty_results() {
    let (_dir, ledger) = unreachable();
    let month: YearMonth = "2024-05".parse().unwrap();

    let listed = ledger.list_transactions(10, None);
    assert!(listed.data.is_empty());
    assert!(listed.error.is_some());

    let cats = ledger.list_categories(None);
    assert!(cats.data.is_empty());
    assert!(cats.error.is_some());

    assert!(ledger.monthly_aggregate(month).data.is_empty());
    assert!(ledger.category_breakdown(month).data.is_empty());

    let inserted = ledger.insert_transaction(&income("2024-05-02", 5000, "Dues"));
    assert!(!inserted.data);
    assert!(inserted.error.unwrap().contains("failed to save transaction"));

    let check = ledger.check_monthly_limit(date("2024-05-02"), 5000);
    assert_eq!(check.data, LimitCheck::default());
    assert!(check.error.is_some());
}

#[test]
fn test_submit_stops_on_storage_error() {
    let (_dir, ledger) = unreachable();
    assert!(matches!(
        ledger.submit(&income("2024-05-02", 5000, "Dues"), false),
        Submission::StorageError(_)
    ));
}
