use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::ledger::{validate, Ledger, Submission};
use crate::models::*;
use crate::report::{self, format_amount, MonthSummary, Totals};
use crate::settings::{Overrides, Settings};
use crate::ui::util::truncate;

#[derive(Debug, Parser)]
#[command(name = "clubledger", version)]
#[command(about = "ClubLedger - income and expense bookkeeping for small clubs")]
#[command(after_help = "Run without a command to open the dashboard.")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) overrides: Overrides,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Record an income or expense
    Add(AddArgs),
    /// List the most recent transactions with totals
    List {
        /// Maximum number of rows (defaults to display.list_limit)
        #[arg(long)]
        limit: Option<u32>,
        /// Only show one type: income or expense
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<TransactionType>,
    },
    /// List the categories available for new transactions
    Categories {
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<TransactionType>,
    },
    /// Monthly totals, remaining limit, daily figures and category split
    Summary {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<YearMonth>,
    },
    /// Check that the database is reachable and show its latest rows
    Check,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Transaction date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// income or expense
    #[arg(long = "type", value_name = "TYPE")]
    kind: TransactionType,
    /// Whole currency units
    #[arg(long, allow_negative_numbers = true)]
    amount: i64,
    #[arg(long)]
    category: String,
    #[arg(long)]
    description: String,
    /// Save an expense even when it takes the month over the limit
    #[arg(long)]
    confirm_over_limit: bool,
}

pub(crate) fn as_cli(command: Command, ledger: &Ledger, settings: &Settings) -> Result<()> {
    match command {
        Command::Add(args) => cli_add(args, ledger),
        Command::List { limit, kind } => {
            cli_list(ledger, limit.unwrap_or(settings.display.list_limit), kind)
        }
        Command::Categories { kind } => cli_categories(ledger, kind),
        Command::Summary { month } => cli_summary(ledger, month.unwrap_or_else(YearMonth::current)),
        Command::Check => cli_check(ledger),
    }
}

fn cli_add(args: AddArgs, ledger: &Ledger) -> Result<()> {
    let txn = NewTransaction::new(
        args.date.unwrap_or_else(|| Local::now().date_naive()),
        args.kind,
        args.amount,
        args.category,
        args.description,
    );
    if let Err(e) = validate(&txn) {
        bail!(e);
    }

    let categories = ledger.list_categories(Some(txn.kind));
    if let Some(e) = categories.error {
        bail!(e);
    }
    if !categories.data.contains(&txn.category) {
        bail!(
            "Unknown {} category '{}'. Available: {}",
            txn.kind,
            txn.category,
            categories.data.join(", ")
        );
    }

    let outcome = ledger.submit(&txn, args.confirm_over_limit);
    if outcome.is_saved() {
        println!(
            "Saved {} of {} on {} ({})",
            txn.kind,
            format_amount(txn.amount),
            txn.date,
            txn.category
        );
        return Ok(());
    }
    if let Submission::OverLimit { .. } = outcome {
        bail!(
            "{}. Re-run with --confirm-over-limit to save it anyway",
            outcome.message()
        );
    }
    bail!(outcome.message())
}

fn cli_list(ledger: &Ledger, limit: u32, kind: Option<TransactionType>) -> Result<()> {
    let result = ledger.list_transactions(limit, kind);
    if let Some(e) = result.error {
        bail!(e);
    }
    let txns = result.data;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<8} {:<16} {:>14}  Description",
        "ID", "Date", "Type", "Category", "Amount"
    );
    println!("{}", "─".repeat(80));
    for t in &txns {
        println!(
            "{:<5} {:<10} {:<8} {:<16} {:>14}  {}",
            t.id,
            t.date.to_string(),
            t.kind,
            truncate(&t.category, 16),
            format_amount(t.signed_amount()),
            t.description
        );
    }

    let totals = Totals::of_transactions(&txns);
    println!("{}", "─".repeat(80));
    println!(
        "{} rows  Income {}  Expense {}  Net {}",
        txns.len(),
        format_amount(totals.income),
        format_amount(totals.expense),
        format_amount(totals.net())
    );
    Ok(())
}

fn cli_categories(ledger: &Ledger, kind: Option<TransactionType>) -> Result<()> {
    let kinds: Vec<TransactionType> = match kind {
        Some(k) => vec![k],
        None => TransactionType::all().to_vec(),
    };
    for k in kinds {
        let result = ledger.list_categories(Some(k));
        if let Some(e) = result.error {
            bail!(e);
        }
        println!("{}:", k.label());
        for name in &result.data {
            println!("  {name}");
        }
    }
    Ok(())
}

fn cli_summary(ledger: &Ledger, month: YearMonth) -> Result<()> {
    let aggregate = ledger.monthly_aggregate(month);
    if let Some(e) = aggregate.error {
        bail!(e);
    }
    let breakdown = ledger.category_breakdown(month);
    if let Some(e) = breakdown.error {
        bail!(e);
    }

    let summary = MonthSummary::new(month, &aggregate.data, ledger.monthly_limit());
    let remaining = summary.limit_remaining();

    println!("ClubLedger {month}");
    println!("{}", "─".repeat(40));
    println!("  Income:     {}", format_amount(summary.totals.income));
    println!("  Expenses:   {}", format_amount(summary.totals.expense));
    println!("  Balance:    {}", format_amount(summary.balance()));
    if summary.is_over_limit() {
        println!(
            "  Limit:      {} (over by {})",
            format_amount(summary.limit),
            format_amount(-remaining)
        );
    } else {
        println!(
            "  Limit:      {} ({} left)",
            format_amount(summary.limit),
            format_amount(remaining)
        );
    }

    let daily = report::pivot_daily(&aggregate.data);
    if !daily.is_empty() {
        println!();
        println!("{:<12} {:>14} {:>14}", "Date", "Income", "Expense");
        for d in &daily {
            println!(
                "{:<12} {:>14} {:>14}",
                d.date.to_string(),
                format_amount(d.income),
                format_amount(d.expense)
            );
        }
    }

    let (income, expense) = report::split_by_type(&breakdown.data);
    for (title, rows) in [("Income by Category:", income), ("Expenses by Category:", expense)] {
        if rows.is_empty() {
            continue;
        }
        println!();
        println!("{title}");
        for r in rows {
            println!("  {:<24} {:>14}", r.category, format_amount(r.total));
        }
    }
    Ok(())
}

fn cli_check(ledger: &Ledger) -> Result<()> {
    let path = ledger.database().path().display().to_string();
    println!("Database: {path}");

    let result = ledger.diagnostics(3);
    if let Some(e) = result.error {
        eprintln!("Connection failed: {e}");
        eprintln!();
        eprintln!("Things to check:");
        eprintln!("  - database.path (or --db) points at the right file");
        eprintln!("  - the file and its directory are readable and writable");
        eprintln!("  - no other process holds a lock longer than database.busy_timeout_ms");
        bail!("Database check failed");
    }

    let diag = result.data;
    println!("Connection OK");
    println!("Tables: {}", diag.tables.join(", "));
    println!("Transactions: {}", diag.transaction_count);
    if !diag.recent.is_empty() {
        println!();
        println!("Most recent:");
        for t in &diag.recent {
            println!(
                "  {}  {:<8} {:>14}  {}  ({})",
                t.date,
                t.kind,
                format_amount(t.amount),
                t.description,
                t.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    Ok(())
}
