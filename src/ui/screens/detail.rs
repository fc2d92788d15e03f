use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::dashboard::render_vendors;
use crate::charts::vendor_totals;
use crate::models::SplitChoice;
use crate::pipeline::SortColumn;
use crate::ui::app::App;
use crate::ui::table::currency;
use crate::ui::theme;
use crate::ui::util::truncate;

const COLUMNS: [(SortColumn, &str); 4] = [
    (SortColumn::Date, "Date"),
    (SortColumn::Description, "Description"),
    (SortColumn::Amount, "Amount"),
    (SortColumn::Split, "Split"),
];

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = app.detail.as_ref() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Category Detail ", theme::dim_style()));
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Pick a category on the dashboard (2) and press Enter",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(6)])
        .split(area);

    let active = app.detail_sort.active();
    let header_cells = COLUMNS.iter().map(|(column, name)| {
        let label = match active {
            Some((c, dir)) if c == *column => format!("{name} {}", dir.arrow()),
            _ => (*name).to_string(),
        };
        Cell::from(label).style(theme::header_style())
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = detail
        .records
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            let style = if i == app.detail_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let amount_style = if txn.amount.is_sign_negative() {
                theme::debit_style()
            } else {
                theme::credit_style()
            };
            let split = SplitChoice::from_flag(txn.split).map_or("-".to_string(), |s| s.to_string());
            Row::new(vec![
                Cell::from(txn.transaction_date.clone()),
                Cell::from(truncate(&txn.description, 48)),
                Cell::from(Span::styled(currency(Some(txn.amount)), amount_style)),
                Cell::from(split),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(6),
    ];

    let title = format!(" {} ({}) ", detail.category, detail.records.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    let mut state = TableState::default().with_selected(Some(app.detail_cursor));
    f.render_stateful_widget(table, chunks[0], &mut state);

    let totals = vendor_totals(&detail.records, &app.vendor_rules);
    render_vendors(f, chunks[1], &totals, " Vendors ");
}
