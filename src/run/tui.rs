use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::ledger::Ledger;
use crate::models::YearMonth;
use crate::settings::Settings;
use crate::ui::app::{App, Screen};
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// Rows taken by the tab, status and message bars plus the table border,
/// header and totals footer.
const CHROME_ROWS: u16 = 7;

pub(crate) fn as_tui(ledger: &Ledger, settings: &Settings, startup_error: Option<String>) -> Result<()> {
    let mut app = App::new(
        YearMonth::current(),
        ledger.monthly_limit(),
        settings.display.list_limit,
    );
    app.refresh(ledger);
    if let Some(e) = startup_error {
        app.set_status(e);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, ledger);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("dashboard stopped: {e:?}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ledger: &Ledger,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(CHROME_ROWS) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            handle_key(key, app, ledger);
        }
    }
    Ok(())
}

fn handle_key(key: event::KeyEvent, app: &mut App, ledger: &Ledger) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('1') => app.screen = Screen::Dashboard,
        KeyCode::Char('2') => app.screen = Screen::Transactions,
        KeyCode::Char('3') => app.screen = Screen::Statistics,
        KeyCode::Tab => app.screen = app.screen.next(),
        KeyCode::BackTab => app.screen = app.screen.prev(),
        KeyCode::Char('H') => app.prev_month(ledger),
        KeyCode::Char('L') => app.next_month(ledger),
        KeyCode::Char('r') => {
            app.set_status("Reloaded");
            app.refresh(ledger);
        }
        KeyCode::Char('t') if app.screen == Screen::Transactions => {
            app.cycle_type_filter(ledger);
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ if app.screen == Screen::Transactions => handle_list_movement(key, app),
        _ => {}
    }
}

fn handle_list_movement(key: event::KeyEvent, app: &mut App) {
    let len = app.transactions.len();
    let page = app.visible_rows;
    let (index, scroll) = (&mut app.transaction_index, &mut app.transaction_scroll);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => scroll_down(index, scroll, len, page),
        KeyCode::Char('k') | KeyCode::Up => scroll_up(index, scroll),
        KeyCode::Char('g') | KeyCode::Home => scroll_to_top(index, scroll),
        KeyCode::Char('G') | KeyCode::End => scroll_to_bottom(index, scroll, len, page),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..(page / 2).max(1) {
                scroll_down(index, scroll, len, page);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..(page / 2).max(1) {
                scroll_up(index, scroll);
            }
        }
        _ => {}
    }
}
