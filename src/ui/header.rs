//! Header bar and address input.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{App, EditTarget, ScanStatus};
use crate::theme::{ERROR_COLOR, MUTED_COLOR, PRIMARY_COLOR, SUCCESS_COLOR, WARNING_COLOR};

use super::helpers::create_border_block;

const PLACEHOLDER: &str = "Press / and enter a wallet address";

/// Renders the header: logo and root on the left, graph status on the right.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = create_border_block("", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    frame.render_widget(Paragraph::new(title_line(app)), inner);
    frame.render_widget(
        Paragraph::new(status_line(app)).alignment(Alignment::Right),
        inner,
    );
}

fn title_line(app: &App) -> Line<'static> {
    let mut spans = vec!["[".into(), "seer".cyan().bold(), "]".into()];
    if let Some(root) = app.session.root() {
        spans.push("  ".into());
        spans.push(Span::styled(
            app.session.names().full_label(root).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn status_line(app: &App) -> Line<'static> {
    let session = &app.session;
    let elements = session.elements();
    let mut spans = Vec::new();

    if session.is_loading() {
        spans.push(Span::styled("Loading… ", Style::default().fg(WARNING_COLOR)));
    } else if session.is_expanding() {
        spans.push(Span::styled("Expanding… ", Style::default().fg(WARNING_COLOR)));
    }
    match session.scan_status() {
        ScanStatus::Scanning { done, total } => spans.push(Span::styled(
            format!("Scanning {done}/{total} "),
            Style::default().fg(WARNING_COLOR),
        )),
        ScanStatus::Done { creators } => spans.push(Span::styled(
            format!("{creators} creators "),
            Style::default().fg(SUCCESS_COLOR),
        )),
        ScanStatus::Idle => {}
    }
    spans.push(Span::styled(
        format!(
            "{} nodes · {} edges · {}/{} tx",
            elements.nodes.len(),
            elements.edges.len(),
            session.filtered_count(),
            session.transfers().len()
        ),
        Style::default().fg(MUTED_COLOR),
    ));
    Line::from(spans)
}

/// Renders the address input with its validation message.
pub fn render_address_bar(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.ui.editing == Some(EditTarget::Address);
    let mut block = create_border_block("Address", editing);
    if let Some(message) = app.session.validation() {
        block = block.title_bottom(Line::styled(
            format!(" {message} "),
            Style::default().fg(ERROR_COLOR),
        ));
    }

    let input = &app.ui.address_input;
    let line = if editing {
        Line::from(vec![
            Span::raw(input.clone()),
            Span::styled("█", Style::default().fg(PRIMARY_COLOR)),
        ])
    } else if input.is_empty() {
        Line::styled(PLACEHOLDER, Style::default().fg(MUTED_COLOR))
    } else {
        Line::raw(input.clone())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Tests
// ============================================================================
