use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, Screen};
use super::theme;
use crate::report::format_amount;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Message bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_message_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = i + 1;
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), theme::dim_style()),
                    Span::styled(
                        s.to_string(),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), theme::dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, area, app),
        Screen::Transactions => super::screens::transactions::render(f, area, app),
        Screen::Statistics => super::screens::statistics::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = " VIEW ";
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(theme::ACCENT)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} | limit {} ",
        app.screen,
        app.month,
        format_amount(app.summary.limit)
    );

    let right = match app.screen {
        Screen::Dashboard | Screen::Statistics => " H/L month | r reload | ? help ",
        Screen::Transactions => " j/k move | t type | r reload | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_label, mode_style),
        Span::styled(info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_message_bar(f: &mut Frame, area: Rect, app: &App) {
    let content = if app.status_message.is_empty() {
        Line::from(Span::styled(
            " Read-only view. Record transactions with `clubledger add`. Press ? for help",
            theme::dim_style(),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {}", app.status_message),
            theme::message_bar_style(),
        ))
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);
}

fn help_heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {text}"), theme::normal_style()))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " ClubLedger Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        help_heading("Navigation"),
        help_line("1-3              Switch tabs           Tab/Shift-Tab  Cycle tabs"),
        help_line("H/L              Prev/Next month       j/k or Up/Down Move cursor"),
        help_line("g/G              Top/Bottom            Ctrl-d/u       Page Down/Up"),
        Line::from(""),
        help_heading("Actions"),
        help_line("t (Transactions) Cycle type filter     r              Reload"),
        help_line("Esc              Clear message         q or Ctrl-q    Quit"),
        Line::from(""),
        help_heading("Command line"),
        help_line("clubledger add --type expense --amount 3000 --category Supplies \\"),
        help_line("    --description \"Cups\" [--date 2024-05-01] [--confirm-over-limit]"),
        help_line("clubledger list | categories | summary [YYYY-MM] | check"),
        Line::from(""),
        Line::from(Span::styled(" Press any key to close ", theme::dim_style())),
    ];

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
