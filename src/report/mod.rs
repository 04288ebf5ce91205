//! In-memory reductions over query rows for the summary cards, charts and
//! list footers.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::*;

/// Format whole currency units with thousand separators.
/// e.g. `1234567` → `"₩1,234,567"`
pub(crate) fn format_amount(val: i64) -> String {
    let digits = val.unsigned_abs().to_string();
    let with_commas: String = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < 0 {
        format!("-₩{with_commas}")
    } else {
        format!("₩{with_commas}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) income: i64,
    pub(crate) expense: i64,
}

impl Totals {
    pub(crate) fn add(&mut self, kind: TransactionType, amount: i64) {
        match kind {
            TransactionType::Income => self.income = self.income.saturating_add(amount),
            TransactionType::Expense => self.expense = self.expense.saturating_add(amount),
        }
    }

    pub(crate) fn net(&self) -> i64 {
        self.income.saturating_sub(self.expense)
    }

    pub(crate) fn of_transactions(txns: &[Transaction]) -> Self {
        let mut totals = Self::default();
        for t in txns {
            totals.add(t.kind, t.amount);
        }
        totals
    }

    pub(crate) fn of_aggregate(rows: &[AggregateRow]) -> Self {
        let mut totals = Self::default();
        for r in rows {
            totals.add(r.kind, r.total);
        }
        totals
    }
}

/// Headline figures for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthSummary {
    pub(crate) month: YearMonth,
    pub(crate) totals: Totals,
    pub(crate) limit: i64,
}

impl MonthSummary {
    pub(crate) fn new(month: YearMonth, rows: &[AggregateRow], limit: i64) -> Self {
        Self {
            month,
            totals: Totals::of_aggregate(rows),
            limit,
        }
    }

    pub(crate) fn balance(&self) -> i64 {
        self.totals.net()
    }

    pub(crate) fn is_over_limit(&self) -> bool {
        self.totals.expense > self.limit
    }

    /// Negative once the limit has been passed.
    pub(crate) fn limit_remaining(&self) -> i64 {
        self.limit - self.totals.expense
    }
}

/// One point of the daily income/expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DailyTotals {
    pub(crate) date: NaiveDate,
    pub(crate) income: i64,
    pub(crate) expense: i64,
}

/// Pivot aggregate rows into one entry per date, ascending, with missing
/// types filled with zero.
pub(crate) fn pivot_daily(rows: &[AggregateRow]) -> Vec<DailyTotals> {
    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for r in rows {
        by_date.entry(r.date).or_default().add(r.kind, r.total);
    }
    by_date
        .into_iter()
        .map(|(date, t)| DailyTotals {
            date,
            income: t.income,
            expense: t.expense,
        })
        .collect()
}

/// Split category totals into (income, expense), keeping their order.
pub(crate) fn split_by_type(rows: &[CategoryTotal]) -> (Vec<&CategoryTotal>, Vec<&CategoryTotal>) {
    rows.iter().partition(|r| r.kind == TransactionType::Income)
}
