//! Transfers touching the selected node.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::domain::CreatedCoin;
use crate::state::{App, DetailRow, Focus};
use crate::theme::{
    CREATOR_COLOR, HIGHLIGHT_STYLE, MUTED_COLOR, PRIMARY_COLOR, SUCCESS_COLOR, WARNING_COLOR,
};
use crate::ui::helpers::create_border_block;

/// Lines per transfer in the list.
const ROW_HEIGHT: usize = 2;

/// Created coins listed before the remainder is summarised.
const MAX_CREATED_ROWS: usize = 4;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.ui.focus == Focus::Transactions;
    let session = &app.session;
    let title = match session.selected() {
        Some(id) => format!("Transfers · {}", session.names().label(id)),
        None => "Transfers".to_string(),
    };
    let block = create_border_block(&title, focused);
    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(id) = session.selected() {
        let coins = session.creators().coins_of(id);
        if !coins.is_empty() {
            let height = created_section_height(coins.len());
            let [created, rest] =
                Layout::vertical([Constraint::Length(height), Constraint::Min(0)]).areas(inner);
            render_created_coins(frame, created, coins);
            inner = rest;
        }
    }

    let rows = session.detail();
    if rows.is_empty() {
        let message = if session.selected().is_some() {
            "No transfers in the current filter"
        } else {
            "Click a node to list its transfers"
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(MUTED_COLOR))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let selected_index = app.ui.detail_index.min(rows.len() - 1);
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| list_item(row, focused && index == selected_index))
        .collect();

    let mut state = ListState::default();
    if focused {
        state.select(Some(selected_index));
    }
    let list = List::new(items).highlight_style(HIGHLIGHT_STYLE);
    frame.render_stateful_widget(list, inner, &mut state);

    let visible = usize::from(inner.height) / ROW_HEIGHT;
    if rows.len() > visible {
        let mut scrollbar_state = ScrollbarState::new(rows.len()).position(selected_index);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            Rect::new(inner.x, inner.y, inner.width.saturating_add(1), inner.height),
            &mut scrollbar_state,
        );
    }
}

// ============================================================================
// Coins Created
// ============================================================================

/// Heading, up to [`MAX_CREATED_ROWS`] coins, an overflow line and a spacer.
fn created_section_height(count: usize) -> u16 {
    let overflow = usize::from(count > MAX_CREATED_ROWS);
    let rows = count.min(MAX_CREATED_ROWS) + overflow + 2;
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_created_coins(frame: &mut Frame, area: Rect, coins: &[CreatedCoin]) {
    let mut lines = vec![Line::from(Span::styled(
        format!("Coins created ({})", coins.len()),
        Style::default()
            .fg(CREATOR_COLOR)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(coins.iter().take(MAX_CREATED_ROWS).map(created_coin_line));
    if coins.len() > MAX_CREATED_ROWS {
        lines.push(Line::from(Span::styled(
            format!("  +{} more", coins.len() - MAX_CREATED_ROWS),
            Style::default().fg(MUTED_COLOR),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn created_coin_line(coin: &CreatedCoin) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    if !coin.symbol.is_empty() {
        spans.push(Span::styled(
            coin.symbol.clone(),
            Style::default()
                .fg(PRIMARY_COLOR)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    if !coin.name.is_empty() && !coin.name.eq_ignore_ascii_case(&coin.symbol) {
        spans.push(Span::styled(coin.name.clone(), Style::default().fg(WARNING_COLOR)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        coin.coin_type.clone(),
        Style::default().fg(MUTED_COLOR),
    ));
    Line::from(spans)
}

// ============================================================================
// Transfer Rows
// ============================================================================

fn list_item(row: &DetailRow, is_selected: bool) -> ListItem<'static> {
    let indicator = if is_selected { "▶" } else { " " };
    let direction_color = if row.outgoing { WARNING_COLOR } else { SUCCESS_COLOR };
    let digest = row
        .digest
        .as_deref()
        .map_or_else(|| "no digest".to_string(), short_digest);

    ListItem::new(vec![
        Line::from(vec![
            Span::raw(format!("{indicator} ")),
            Span::styled(
                format!("{:<3}", row.direction_label()),
                Style::default()
                    .fg(direction_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(row.amount.clone(), Style::default().fg(PRIMARY_COLOR)),
            Span::raw(if row.outgoing { " to " } else { " from " }),
            Span::raw(row.counterparty_label.clone()),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{}  {digest}", row.date()),
                Style::default().fg(MUTED_COLOR),
            ),
        ]),
    ])
}

fn short_digest(digest: &str) -> String {
    let chars: Vec<char> = digest.chars().collect();
    if chars.len() <= 12 {
        return digest.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Action, FetchMode};
    use crate::test_utils::{FakeTransfers, TransferMother, app_with, buffer_to_string};
    use ratatui::{Terminal, backend::TestBackend};
    use rstest::rstest;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(48, 12)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), app))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    fn app_with_selection() -> App {
        let mut app = app_with(FakeTransfers::default());
        app.session.dispatch(Action::LoadRequested("0xa".into()));
        app.session.dispatch(Action::TransfersLoaded {
            address: "0xa".into(),
            mode: FetchMode::Replace,
            transfers: vec![
                TransferMother::sui("0xa", "0xb", 1_704_067_200_000),
                TransferMother::sui("0xc", "0xa", 1_704_153_600_000),
            ],
        });
        app.session
            .dispatch(Action::SelectNode(Some("0xa".to_string())));
        app
    }

    #[test]
    fn test_prompt_without_selection() {
        let app = app_with(FakeTransfers::default());
        assert!(draw(&app).contains("Click a node to list its transfers"));
    }

    #[test]
    fn test_rows_for_selected_node() {
        let app = app_with_selection();
        let content = draw(&app);
        assert!(content.contains("Transfers · 0xa"), "got:\n{content}");
        assert!(content.contains("OUT 1 sui to 0xb"), "got:\n{content}");
        assert!(content.contains("IN  1 sui from 0xc"), "got:\n{content}");
        assert!(content.contains("2024-01-01 00:00"), "got:\n{content}");
    }

    #[test]
    fn test_cursor_shown_only_when_focused() {
        let mut app = app_with_selection();
        assert!(!draw(&app).contains('▶'));
        app.ui.focus = Focus::Transactions;
        assert!(draw(&app).contains('▶'));
    }

    fn record_created(app: &mut App, address: &str, coin_types: &[&str]) {
        app.session.dispatch(Action::ScanProgress {
            address: address.to_string(),
            coins: coin_types
                .iter()
                .map(|coin_type| CreatedCoin::new(*coin_type, None))
                .collect(),
            done: 1,
            total: 1,
        });
    }

    #[test]
    fn test_created_coins_listed_above_transfers() {
        let mut app = app_with_selection();
        record_created(&mut app, "0xa", &["0xabc::meme::MEME"]);

        let content = draw(&app);
        assert!(content.contains("Coins created (1)"), "got:\n{content}");
        assert!(content.contains("MEME 0xabc::meme::MEME"), "got:\n{content}");
        assert!(content.contains("OUT 1 sui to 0xb"), "got:\n{content}");
        let heading = content.find("Coins created").unwrap();
        let first_row = content.find("OUT 1 sui").unwrap();
        assert!(heading < first_row);
    }

    #[test]
    fn test_created_coins_overflow_is_summarised() {
        let mut app = app_with_selection();
        record_created(
            &mut app,
            "0xa",
            &["0x1::a::A", "0x1::b::B", "0x1::c::C", "0x1::d::D", "0x1::e::E"],
        );

        let content = draw(&app);
        assert!(content.contains("Coins created (5)"), "got:\n{content}");
        assert!(content.contains("+1 more"), "got:\n{content}");
        assert!(!content.contains("0x1::e::E"), "got:\n{content}");
    }

    #[test]
    fn test_no_created_section_for_other_nodes() {
        let mut app = app_with_selection();
        record_created(&mut app, "0xc", &["0xabc::meme::MEME"]);
        assert!(!draw(&app).contains("Coins created"));
    }

    #[rstest]
    #[case("abc", "abc")]
    #[case("9xYqZ1bcDeFgHiJkLmNo", "9xYqZ1…LmNo")]
    fn test_short_digest(#[case] digest: &str, #[case] expected: &str) {
        assert_eq!(short_digest(digest), expected);
    }
}
