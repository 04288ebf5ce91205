use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::report::{format_amount, Totals};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let filter = app.type_filter.map_or("All", |k| k.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(theme::OVERLAY))
        .title(theme::block_title(&format!(
            "Transactions ({}) [{filter}]",
            app.transactions.len()
        )));

    if app.transactions.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Record one with `clubledger add`, or press t to change the filter",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let header = Row::new(
        ["Date", "Type", "Category", "Description", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(chunks[0].height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };

            Row::new(vec![
                Cell::from(txn.date.to_string()),
                Cell::from(Span::styled(txn.kind.label(), amount_style)),
                Cell::from(truncate(&txn.category, 16)),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(Span::styled(format_amount(txn.signed_amount()), amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(18),
        Constraint::Min(20),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, chunks[0]);

    let totals = Totals::of_transactions(&app.transactions);
    let footer = Line::from(vec![
        Span::styled(" Income ", theme::dim_style()),
        Span::styled(format_amount(totals.income), theme::income_style()),
        Span::styled("   Expense ", theme::dim_style()),
        Span::styled(format_amount(totals.expense), theme::expense_style()),
        Span::styled("   Net ", theme::dim_style()),
        Span::styled(format_amount(totals.net()), theme::normal_style()),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[1]);
}
