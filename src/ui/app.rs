use crate::ledger::Ledger;
use crate::models::*;
use crate::report::{self, DailyTotals, MonthSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Statistics,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions, Self::Statistics]
    }

    pub(crate) fn next(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + 1) % screens.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + screens.len() - 1) % screens.len()]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Statistics => write!(f, "Statistics"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) month: YearMonth,
    pub(crate) list_limit: u32,

    // Dashboard
    pub(crate) summary: MonthSummary,
    pub(crate) daily: Vec<DailyTotals>,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) type_filter: Option<TransactionType>,

    // Statistics
    pub(crate) breakdown: Vec<CategoryTotal>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(month: YearMonth, monthly_limit: i64, list_limit: u32) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            status_message: String::new(),
            show_help: false,
            month,
            list_limit,

            summary: MonthSummary::new(month, &[], monthly_limit),
            daily: Vec::new(),

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            type_filter: None,

            breakdown: Vec::new(),

            visible_rows: 20,
        }
    }

    /// Re-query everything the screens show. Failed queries leave empty data
    /// and put the error in the status bar.
    pub(crate) fn refresh(&mut self, ledger: &Ledger) {
        let mut errors = Vec::new();

        let aggregate = ledger.monthly_aggregate(self.month);
        errors.extend(aggregate.error);
        self.summary = MonthSummary::new(self.month, &aggregate.data, ledger.monthly_limit());
        self.daily = report::pivot_daily(&aggregate.data);

        let breakdown = ledger.category_breakdown(self.month);
        errors.extend(breakdown.error);
        self.breakdown = breakdown.data;

        let listed = ledger.list_transactions(self.list_limit, self.type_filter);
        errors.extend(listed.error);
        self.transactions = listed.data;
        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
            self.transaction_scroll = self.transaction_scroll.min(self.transaction_index);
        }

        if let Some(first) = errors.into_iter().next() {
            self.set_status(first);
        }
    }

    pub(crate) fn next_month(&mut self, ledger: &Ledger) {
        self.month = self.month.next();
        self.set_status(format!("Month: {}", self.month));
        self.refresh(ledger);
    }

    pub(crate) fn prev_month(&mut self, ledger: &Ledger) {
        self.month = self.month.prev();
        self.set_status(format!("Month: {}", self.month));
        self.refresh(ledger);
    }

    /// All, then income only, then expense only.
    pub(crate) fn cycle_type_filter(&mut self, ledger: &Ledger) {
        self.type_filter = match self.type_filter {
            None => Some(TransactionType::Income),
            Some(TransactionType::Income) => Some(TransactionType::Expense),
            Some(TransactionType::Expense) => None,
        };
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        let label = self.type_filter.map_or("All", |k| k.label());
        self.set_status(format!("Showing: {label}"));
        self.refresh(ledger);
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
