use chrono::NaiveDate;

use super::TransactionType;

/// One day's total for one transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub total: i64,
}

/// A month's total for one category and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub kind: TransactionType,
    pub total: i64,
}
