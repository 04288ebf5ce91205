//! Caller-facing operations over the [`Database`].
//!
//! Storage failures never cross this boundary as errors. Each operation
//! returns a [`QueryResult`] holding either the data or an empty/zero value
//! together with a message describing what went wrong.

mod guard;

use chrono::NaiveDate;

use crate::db::{self, Database, Diagnostics};
use crate::models::*;

pub(crate) use guard::{validate, LimitCheck, Submission};

/// Data from a storage operation plus an optional error message.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueryResult<T> {
    pub(crate) data: T,
    pub(crate) error: Option<String>,
}

impl<T> QueryResult<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub(crate) fn failed(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
        }
    }

    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            data: f(self.data),
            error: self.error,
        }
    }
}

impl<T: Default> QueryResult<T> {
    fn from_db(context: &str, result: db::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                tracing::error!("{context}: {e}");
                Self::failed(T::default(), format!("{context}: {e}"))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    db: Database,
    monthly_limit: i64,
}

impl Ledger {
    pub(crate) fn new(db: Database, monthly_limit: i64) -> Self {
        Self { db, monthly_limit }
    }

    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    pub(crate) fn monthly_limit(&self) -> i64 {
        self.monthly_limit
    }

    /// Append a row. `data` is `true` when the row was stored.
    pub(crate) fn insert_transaction(&self, txn: &NewTransaction) -> QueryResult<bool> {
        let saved = self.db.insert_transaction(txn).map(|id| {
            tracing::info!(id, date = %txn.date, kind = %txn.kind, amount = txn.amount, "transaction saved");
            true
        });
        QueryResult::from_db("failed to save transaction", saved)
    }

    pub(crate) fn list_transactions(
        &self,
        limit: u32,
        kind: Option<TransactionType>,
    ) -> QueryResult<Vec<Transaction>> {
        QueryResult::from_db(
            "failed to load transactions",
            self.db.list_transactions(limit, kind),
        )
    }

    /// Category names, for one type or for all.
    pub(crate) fn list_categories(&self, kind: Option<TransactionType>) -> QueryResult<Vec<String>> {
        QueryResult::from_db("failed to load categories", self.db.list_categories(kind))
            .map(|cats| cats.into_iter().map(|c| c.name).collect())
    }

    pub(crate) fn monthly_aggregate(&self, month: YearMonth) -> QueryResult<Vec<AggregateRow>> {
        QueryResult::from_db(
            "failed to load monthly totals",
            self.db.monthly_aggregate(month),
        )
    }

    pub(crate) fn category_breakdown(&self, month: YearMonth) -> QueryResult<Vec<CategoryTotal>> {
        QueryResult::from_db(
            "failed to load category totals",
            self.db.category_breakdown(month),
        )
    }

    pub(crate) fn is_duplicate(&self, txn: &NewTransaction) -> QueryResult<bool> {
        QueryResult::from_db("failed to check for duplicates", self.db.is_duplicate(txn))
    }

    /// Expense total for the month of `date` plus `amount`, compared with the monthly limit.
    ///
    /// On a storage failure the data is `LimitCheck::default()` (not exceeded, zero total).
    pub(crate) fn check_monthly_limit(&self, date: NaiveDate, amount: i64) -> QueryResult<LimitCheck> {
        match self.db.expense_total(YearMonth::of(date)) {
            Ok(current) => QueryResult::ok(LimitCheck::project(current, amount, self.monthly_limit)),
            Err(e) => QueryResult::from_db("failed to check the monthly expense limit", Err(e)),
        }
    }

    pub(crate) fn diagnostics(&self, recent: u32) -> QueryResult<Diagnostics> {
        QueryResult::from_db("connection check failed", self.db.diagnostics(recent))
    }
}

#[cfg(test)]
mod tests;
