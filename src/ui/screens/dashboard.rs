use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::charts::{
    axis_max, category_totals, needs_wants, split_summary, vendor_label, vendor_totals,
};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

const SLICE_COLORS: [Color; 6] = [
    theme::ACCENT,
    theme::GREEN,
    theme::YELLOW,
    theme::RED,
    theme::MAUVE,
    theme::TEAL,
];

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.report.is_empty() {
        let block = titled_block(" Spending ");
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No transactions ({})", app.report_filter.describe()),
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "Refresh with :fetch or widen the range with :csv-from / :csv-to",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Summary cards
            Constraint::Percentage(50), // Categories + needs/wants
            Constraint::Min(6),         // Vendors
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);
    render_category_chart(f, middle[0], app);
    render_needs_wants(f, middle[1], app);
    render_vendor_chart(f, chunks[2], app);
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = split_summary(&app.report);
    let nw = needs_wants(&app.report);

    render_card(f, cards[0], "Total Spend", app.report_total(), theme::TEXT);
    render_card(f, cards[1], "Needs", nw.needs, theme::GREEN);
    render_card(f, cards[2], "Partner Owes", summary.partner_owes, theme::YELLOW);
    render_card(f, cards[3], "You Owe", summary.you_owe, theme::RED);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, color: Color) {
    let title = format!(" {title} ");
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(titled_block(&title));

    f.render_widget(text, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let totals = category_totals(&app.report);
    let grand = app.report_total();

    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, (name, amount))| {
            let share = if grand.is_zero() {
                Decimal::ZERO
            } else {
                (*amount / grand * Decimal::ONE_HUNDRED).round()
            };
            let color = SLICE_COLORS[i % SLICE_COLORS.len()];
            let style = if i == app.category_index {
                Style::default().fg(color).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(color)
            };
            Bar::default()
                .value(amount.to_u64().unwrap_or(0))
                .label(Line::from(truncate(name, 14)))
                .text_value(format!("{} ({share}%)", format_amount(*amount)))
                .style(style)
                .value_style(style.add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(" Spending by Category (Enter for detail) "))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}

fn render_needs_wants(f: &mut Frame, area: Rect, app: &App) {
    let nw = needs_wants(&app.report);
    let bars = [
        Bar::default()
            .value(nw.needs.to_u64().unwrap_or(0))
            .label(Line::from("Needs"))
            .text_value(format_amount(nw.needs))
            .style(Style::default().fg(theme::GREEN)),
        Bar::default()
            .value(nw.wants.to_u64().unwrap_or(0))
            .label(Line::from("Wants"))
            .text_value(format_amount(nw.wants))
            .style(Style::default().fg(theme::YELLOW)),
    ];

    let bar_width = (area.width.saturating_sub(4) / 2).clamp(3, 14);
    let chart = BarChart::default()
        .block(titled_block(" Needs vs Wants "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2)
        .value_style(Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD));

    f.render_widget(chart, area);
}

fn render_vendor_chart(f: &mut Frame, area: Rect, app: &App) {
    let totals = vendor_totals(&app.report, &app.vendor_rules);
    render_vendors(f, area, &totals, " Top Vendors ");
}

/// Horizontal vendor bar chart scaled to [`axis_max`]. Shared with the
/// detail screen.
pub(crate) fn render_vendors(f: &mut Frame, area: Rect, totals: &[(String, Decimal)], title: &str) {
    let max = axis_max(totals).to_u64().unwrap_or(0);
    let rows = area.height.saturating_sub(2) as usize;

    let bars: Vec<Bar> = totals
        .iter()
        .take(rows)
        .map(|(name, amount)| {
            Bar::default()
                .value(amount.to_u64().unwrap_or(0))
                .label(Line::from(vendor_label(name)))
                .text_value(format_amount(*amount))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD))
        })
        .collect();

    let title = format!("{title}(axis {}) ", format_amount(Decimal::from(max)));
    let chart = BarChart::default()
        .block(titled_block(&title))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(max.max(1))
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}
