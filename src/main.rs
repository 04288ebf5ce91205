mod db;
mod ledger;
mod logging;
mod models;
mod report;
mod run;
mod settings;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    let settings = settings::load(&cli.overrides)?;

    let fallback = if cli.command.is_some() {
        logging::Fallback::Stderr
    } else {
        logging::Fallback::Discard
    };
    logging::setup(&settings.logging, fallback)?;

    let db = db::Database::new(
        settings.database.path.clone(),
        settings.database.busy_timeout(),
    );
    // Every later operation reports its own storage errors, so a failed
    // initialization is not fatal here.
    let startup_error = db.initialize().err().map(|e| {
        tracing::error!("database initialization failed: {e}");
        format!("Database unavailable: {e}")
    });

    let ledger = ledger::Ledger::new(db, settings.limits.monthly_expense);

    match cli.command {
        Some(command) => {
            if let Some(e) = &startup_error {
                eprintln!("Warning: {e}");
            }
            run::as_cli(command, &ledger, &settings)
        }
        None => run::as_tui(&ledger, &settings, startup_error),
    }
}
