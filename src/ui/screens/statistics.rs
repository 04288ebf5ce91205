use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::CategoryTotal;
use crate::report::{self, format_amount};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let (income, expense) = report::split_by_type(&app.breakdown);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_category_chart(f, charts[0], "Income by Category", &income, theme::GREEN);
    render_category_chart(f, charts[1], "Expenses by Category", &expense, theme::RED);
    render_daily_table(f, chunks[1], app);
}

fn render_category_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[&CategoryTotal],
    color: ratatui::style::Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(theme::block_title(title));

    if rows.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing recorded this month",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| {
            Bar::default()
                .value(u64::try_from(r.total).unwrap_or(0))
                .text_value(format_amount(r.total))
                .label(Line::from(truncate(&r.category, 14)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(color));

    f.render_widget(chart, area);
}

fn render_daily_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Date", "Income", "Expense", "Net"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .daily
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(d.date.to_string()),
                Cell::from(Span::styled(format_amount(d.income), theme::income_style())),
                Cell::from(Span::styled(format_amount(d.expense), theme::expense_style())),
                Cell::from(format_amount(d.income - d.expense)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(theme::block_title(&format!("Daily Totals {}", app.month))),
    );
    f.render_widget(table, area);
}
