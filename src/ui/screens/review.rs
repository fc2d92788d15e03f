use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::ui::app::App;
use crate::ui::table::DisplayRow;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Review ({}) page {}/{} | {} | {} per page ",
        app.cache.len(),
        app.page,
        app.total_pages().max(1),
        app.range_label(),
        app.page_size,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.cache.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No transactions ({})", app.filter.describe()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Fetch with :fetch or change filters with :status, :from, :to",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = [
        "#", "ID", "Date", "Description", "Amount", "Mine", "Partner", "Split", "Category",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let sections = app.review_sections();
    // 0 shows the full hash, so size the column to the widest one shown.
    let id_chars = match app.config.id_display_len {
        0 => sections
            .iter()
            .flat_map(|s| &s.rows)
            .map(|r| r.id.chars().count())
            .max()
            .unwrap_or(0),
        len => len,
    };
    let id_width = u16::try_from(id_chars).unwrap_or(u16::MAX).saturating_add(1);

    let mut rows: Vec<Row> = Vec::new();
    let mut index = 0;
    let mut selected = None;
    for section in sections {
        rows.push(
            Row::new(vec![Cell::from(Span::styled(
                format!("{} ({})", section.key, section.total),
                theme::group_header_style(),
            ))])
            .style(theme::normal_style()),
        );
        for row in &section.rows {
            if index == app.cursor {
                selected = Some(rows.len());
            }
            rows.push(display_row(row, index == app.cursor, index % 2 == 1));
            index += 1;
        }
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Length(id_width),
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(16),
    ];

    // Keeps the cursor row in view when a page is taller than the terminal.
    let mut state = TableState::default().with_selected(selected);
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_stateful_widget(table, area, &mut state);
}

fn display_row(row: &DisplayRow, is_cursor: bool, alt: bool) -> Row<'static> {
    let amount_style = if row.negative {
        theme::debit_style()
    } else {
        theme::credit_style()
    };

    let split_style = if row.split.locked {
        theme::dim_style()
    } else if row.split.value.is_none() {
        theme::unset_style()
    } else {
        theme::normal_style()
    };
    let split_label = if row.split.locked {
        format!("{}*", row.split.label())
    } else {
        row.split.label().to_string()
    };

    let category = row
        .category
        .as_ref()
        .map(|c| c.label.clone())
        .unwrap_or_default();

    let (marker, seq_style) = if row.edited {
        ("+", theme::edited_style())
    } else {
        (" ", Style::default())
    };

    let style = if is_cursor {
        theme::selected_style()
    } else if alt {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    };

    Row::new(vec![
        Cell::from(Span::styled(format!("{marker}{}", row.seq), seq_style)),
        Cell::from(row.id.clone()),
        Cell::from(row.date.clone()),
        Cell::from(truncate(&row.description, 40)),
        Cell::from(Span::styled(row.amount.clone(), amount_style)),
        Cell::from(row.after_split.clone()),
        Cell::from(row.partner_after_split.clone()),
        Cell::from(Span::styled(split_label, split_style)),
        Cell::from(truncate(&category, 16)),
    ])
    .style(style)
}
