use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use crate::report::{format_amount, DailyTotals};
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Daily chart
            Constraint::Length(3), // Limit gauge
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_daily_chart(f, chunks[1], app);
    render_limit_gauge(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let summary = &app.summary;
    let balance = summary.balance();
    let remaining = summary.limit_remaining();
    let income_days = app.daily.iter().filter(|d| d.income > 0).count();
    let expense_days = app.daily.iter().filter(|d| d.expense > 0).count();

    render_card(
        f,
        cards[0],
        "Income",
        summary.totals.income,
        theme::GREEN,
        format!("{income_days} days"),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        summary.totals.expense,
        theme::RED,
        format!("{expense_days} days"),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        balance,
        if balance >= 0 { theme::GREEN } else { theme::RED },
        String::new(),
    );
    render_card(
        f,
        cards[3],
        "Limit Left",
        remaining,
        if summary.is_over_limit() {
            theme::RED
        } else {
            theme::YELLOW
        },
        format!("of {}", format_amount(summary.limit)),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: i64, color: Color, subtitle: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(theme::block_title(title));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

/// One point per day of the month, zero on days without rows.
fn chart_points(app: &App) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let (start, end) = app.month.bounds();
    let days = (end - start).num_days().max(1) as u32;
    let mut income = vec![0i64; days as usize];
    let mut expense = vec![0i64; days as usize];
    for DailyTotals {
        date,
        income: i,
        expense: e,
    } in &app.daily
    {
        let idx = date.day0() as usize;
        if idx < income.len() {
            income[idx] = *i;
            expense[idx] = *e;
        }
    }
    let to_points = |values: Vec<i64>| -> Vec<(f64, f64)> {
        values
            .into_iter()
            .enumerate()
            .map(|(d, v)| ((d + 1) as f64, v as f64))
            .collect()
    };
    (to_points(income), to_points(expense))
}

fn render_daily_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = theme::block_title(&format!("Daily Income and Expenses {}", app.month));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(title);

    if app.daily.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions for this month. Record one with `clubledger add`",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let (income, expense) = chart_points(app);
    let days = income.len() as f64;
    let peak = app
        .daily
        .iter()
        .map(|d| d.income.max(d.expense))
        .max()
        .unwrap_or(0)
        .max(1);

    let datasets = vec![
        Dataset::default()
            .name("Income")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme::income_style())
            .data(&income),
        Dataset::default()
            .name("Expense")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme::expense_style())
            .data(&expense),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([1.0, days])
                .labels(vec![
                    "1".to_string(),
                    format!("{}", (days as u32).div_ceil(2)),
                    format!("{}", days as u32),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([0.0, peak as f64])
                .labels(vec![
                    format_amount(0),
                    format_amount(peak / 2),
                    format_amount(peak),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_limit_gauge(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.summary;
    let ratio = if summary.limit > 0 {
        summary.totals.expense as f64 / summary.limit as f64
    } else {
        0.0
    };
    let color = if summary.is_over_limit() {
        theme::RED
    } else if ratio >= 0.8 {
        theme::YELLOW
    } else {
        theme::GREEN
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(theme::block_title("Monthly Expense Limit")),
        )
        .gauge_style(Style::default().fg(color).bg(theme::SURFACE))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} / {} ({:.0}%)",
            format_amount(summary.totals.expense),
            format_amount(summary.limit),
            ratio * 100.0
        ));

    f.render_widget(gauge, area);
}
