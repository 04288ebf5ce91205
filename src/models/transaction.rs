use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type '{0}', expected 'income' or 'expense'")]
pub struct ParseTypeError(pub String);

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseTypeError(s.to_string()))
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s).ok_or_else(|| FromSqlError::Other(Box::new(ParseTypeError(s.to_string()))))
    }
}

/// A stored transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionType,
    /// Whole currency units.
    pub amount: i64,
    pub category: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Amount with income positive and expense negative.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Candidate row for an insert, before the storage layer assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub amount: i64,
    pub category: String,
    pub description: String,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        amount: i64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind,
            amount,
            category: category.into(),
            description: description.into(),
        }
    }
}
