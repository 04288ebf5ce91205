pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    name TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    UNIQUE(name, type)
);

CREATE TABLE IF NOT EXISTS transactions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_date TEXT NOT NULL,
    transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
    amount           INTEGER NOT NULL CHECK (amount > 0),
    category         TEXT NOT NULL,
    description      TEXT NOT NULL,
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date);
CREATE INDEX IF NOT EXISTS idx_transactions_type_date ON transactions(transaction_type, transaction_date);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

pub(crate) const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Donations",
    "Event Revenue",
    "Membership Dues",
    "Other Income",
    "Sponsorship",
];

pub(crate) const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Equipment",
    "Events",
    "Food & Drinks",
    "Other Expense",
    "Printing",
    "Supplies",
    "Transportation",
    "Venue Rental",
];
