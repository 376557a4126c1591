//! Filter pane: coin and time filters, draft rules, creator scan, legend.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::graph::{EdgeKind, NodeRole};
use crate::state::ui_state::format_time_input;
use crate::state::{App, EditTarget, FilterRow, Focus, ScanStatus};
use crate::theme::{
    MUTED_COLOR, PRIMARY_COLOR, SELECTED_STYLE, SUCCESS_COLOR, WARNING_COLOR, edge_color,
    node_color,
};
use crate::ui::helpers::create_border_block;

const LABEL_WIDTH: usize = 7;

const MAX_SCAN_ROWS: usize = 8;

const MAX_LISTED_SYMBOLS: usize = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.ui.focus == Focus::Filters;
    let block = create_border_block("Filters", focused);
    let lines = build_lines(app, focused);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn build_lines(app: &App, focused: bool) -> Vec<Line<'static>> {
    let session = &app.session;
    let filter = session.filter();
    let drafts = session.drafts();
    let cursor = focused.then(|| app.ui.current_filter_row(drafts.len()));

    let mut lines = Vec::new();
    let coin = filter.coin.clone().unwrap_or_else(|| "all".to_string());
    lines.push(row(
        "Coin",
        vec![Span::styled(format!("◀ {coin} ▶"), Style::default().fg(PRIMARY_COLOR))],
        cursor == Some(FilterRow::Coin),
    ));
    lines.push(row(
        "Start",
        vec![time_value(app, EditTarget::Start, filter.start)],
        cursor == Some(FilterRow::Start),
    ));
    lines.push(row(
        "End",
        vec![time_value(app, EditTarget::End, filter.end)],
        cursor == Some(FilterRow::End),
    ));

    lines.push(Line::default());
    lines.push(section("Rules", "a add · d del · p apply"));
    if drafts.is_empty() {
        lines.push(muted("  no rules"));
    }
    for (index, draft) in drafts.iter().enumerate() {
        let coin = if draft.coin.is_empty() { "any" } else { draft.coin.as_str() };
        let min = if app.ui.editing == Some(EditTarget::RuleMin(index)) {
            editing_span(&app.ui.field_buffer)
        } else if draft.min_amount.trim().is_empty() {
            Span::styled("0", Style::default().fg(MUTED_COLOR))
        } else {
            Span::raw(draft.min_amount.clone())
        };
        lines.push(row(
            "",
            vec![
                Span::styled(format!("◀ {coin} ▶"), Style::default().fg(PRIMARY_COLOR)),
                Span::raw(" ≥ "),
                min,
            ],
            cursor == Some(FilterRow::Rule(index)),
        ));
    }
    if !session.rules().is_empty() {
        let applied = session
            .rules()
            .iter()
            .map(|rule| format!("{} ≥ {}", rule.coin, rule.min_amount))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(vec![
            Span::styled("  applied ", Style::default().fg(MUTED_COLOR)),
            Span::styled(applied, Style::default().fg(SUCCESS_COLOR)),
        ]));
    }

    lines.push(Line::default());
    lines.push(section("Creators", "s scan · x clear"));
    lines.extend(scan_lines(app));

    lines.push(Line::default());
    lines.push(section("Legend", ""));
    lines.extend(legend_lines());
    lines
}

fn row(label: &str, value: Vec<Span<'static>>, under_cursor: bool) -> Line<'static> {
    let marker = if under_cursor { "▶" } else { " " };
    let mut spans = vec![Span::raw(format!("{marker} {label:<LABEL_WIDTH$}"))];
    spans.extend(value);
    let line = Line::from(spans);
    if under_cursor {
        line.style(SELECTED_STYLE)
    } else {
        line
    }
}

fn section(title: &str, hint: &str) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !hint.is_empty() {
        spans.push(Span::styled(format!("  {hint}"), Style::default().fg(MUTED_COLOR)));
    }
    Line::from(spans)
}

fn muted(text: &str) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().fg(MUTED_COLOR))
}

fn editing_span(buffer: &str) -> Span<'static> {
    Span::styled(format!("{buffer}█"), Style::default().fg(PRIMARY_COLOR))
}

fn time_value(app: &App, target: EditTarget, bound: Option<i64>) -> Span<'static> {
    if app.ui.editing == Some(target) {
        return editing_span(&app.ui.field_buffer);
    }
    let text = format_time_input(bound);
    if text.is_empty() {
        Span::styled("open", Style::default().fg(MUTED_COLOR))
    } else {
        Span::raw(text)
    }
}

fn scan_lines(app: &App) -> Vec<Line<'static>> {
    let session = &app.session;
    let mut lines = Vec::new();
    match session.scan_status() {
        ScanStatus::Idle => lines.push(muted("  not scanned")),
        ScanStatus::Scanning { done, total } => lines.push(Line::styled(
            format!("  scanning {done}/{total}"),
            Style::default().fg(WARNING_COLOR),
        )),
        ScanStatus::Done { creators: 0 } => lines.push(muted("  no creators found")),
        ScanStatus::Done { .. } => {}
    }

    let results = session.scan_results();
    for (address, coins) in results.iter().take(MAX_SCAN_ROWS) {
        let symbols = coins
            .iter()
            .take(MAX_LISTED_SYMBOLS)
            .map(|coin| coin.symbol.clone())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if coins.len() > MAX_LISTED_SYMBOLS { ", …" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("  ● ", Style::default().fg(node_color(NodeRole::Creator))),
            Span::raw(session.names().label(address)),
            Span::styled(
                format!(" {symbols}{more}"),
                Style::default().fg(MUTED_COLOR),
            ),
        ]));
    }
    if results.len() > MAX_SCAN_ROWS {
        lines.push(muted(&format!("  +{} more", results.len() - MAX_SCAN_ROWS)));
    }
    lines
}

fn legend_lines() -> Vec<Line<'static>> {
    let dot = |role: NodeRole, name: &'static str| {
        [
            Span::styled(" ●", Style::default().fg(node_color(role))),
            Span::raw(format!(" {name}")),
        ]
    };
    let bar = |kind: EdgeKind, name: &'static str| {
        [
            Span::styled(" ━", Style::default().fg(edge_color(kind))),
            Span::raw(format!(" {name}")),
        ]
    };
    vec![
        Line::from(
            [
                dot(NodeRole::Root, "root"),
                dot(NodeRole::Creator, "creator"),
            ]
            .concat(),
        ),
        Line::from(
            [dot(NodeRole::Named, "named"), dot(NodeRole::Default, "other")].concat(),
        ),
        Line::from(
            [bar(EdgeKind::Receive, "receive"), bar(EdgeKind::Flow, "flow")].concat(),
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================
