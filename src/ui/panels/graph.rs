//! Bubble map canvas.
//!
//! Graph coordinates grow downwards while the canvas grows upwards, so every
//! y value is negated on the way in.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};

use crate::graph::layout::NODE_DIAMETER;
use crate::graph::viewport::Bounds;
use crate::graph::{GraphElements, GraphNode, Point, Viewport};
use crate::state::{App, Focus};
use crate::theme::{MUTED_COLOR, PRIMARY_COLOR, edge_color, node_color};
use crate::ui::helpers::create_border_block;

/// Edge labels are only drawn when zoomed in at least this far.
const EDGE_LABEL_MAX_UNITS_PER_COL: f64 = 12.0;

const NODE_RADIUS: f64 = NODE_DIAMETER / 2.0;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.ui.focus == Focus::Graph;
    let block = create_border_block("Bubble Map", focused);
    let inner = block.inner(area);
    let elements = app.session.elements();

    if elements.is_empty() {
        frame.render_widget(block, area);
        let message = empty_message(app);
        let y = inner.y + inner.height / 2;
        let line_area = Rect::new(inner.x, y, inner.width, 1.min(inner.height));
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(MUTED_COLOR))
                .alignment(Alignment::Center),
            line_area,
        );
        return;
    }

    let viewport = app.ui.viewport;
    let bounds = viewport.bounds(inner);
    let selected = app.session.selected();
    let block = if app.session.filtered_count() == 0 && !app.session.transfers().is_empty() {
        block.title_bottom(Line::styled(
            " No transfers match the current filters ",
            Style::default().fg(MUTED_COLOR),
        ))
    } else {
        block
    };
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.min_x, bounds.max_x])
        .y_bounds([-bounds.max_y, -bounds.min_y])
        .paint(move |ctx| paint(ctx, elements, &viewport, &bounds, selected));
    frame.render_widget(canvas, area);
}

fn empty_message(app: &App) -> &'static str {
    if app.session.is_loading() {
        "Loading transfers…"
    } else {
        "Press / to enter a wallet address"
    }
}

fn paint(
    ctx: &mut Context<'_>,
    elements: &GraphElements,
    viewport: &Viewport,
    bounds: &Bounds,
    selected: Option<&str>,
) {
    for edge in &elements.edges {
        let (Some(source), Some(target)) =
            (elements.node(&edge.source), elements.node(&edge.target))
        else {
            continue;
        };
        ctx.draw(&CanvasLine {
            x1: source.position.x,
            y1: -source.position.y,
            x2: target.position.x,
            y2: -target.position.y,
            color: edge_color(edge.kind),
        });
    }

    for node in &elements.nodes {
        ctx.draw(&Circle {
            x: node.position.x,
            y: -node.position.y,
            radius: NODE_RADIUS,
            color: node_color(node.role),
        });
        if selected == Some(node.id.as_str()) {
            ctx.draw(&Circle {
                x: node.position.x,
                y: -node.position.y,
                radius: NODE_RADIUS * 1.3,
                color: PRIMARY_COLOR,
            });
        }
    }

    ctx.layer();

    if viewport.units_per_col <= EDGE_LABEL_MAX_UNITS_PER_COL {
        for edge in &elements.edges {
            let (Some(source), Some(target)) =
                (elements.node(&edge.source), elements.node(&edge.target))
            else {
                continue;
            };
            let mid = Point::new(
                (source.position.x + target.position.x) / 2.0,
                (source.position.y + target.position.y) / 2.0,
            );
            print_centered(
                ctx,
                viewport,
                bounds,
                mid,
                Line::styled(edge.label.clone(), Style::default().fg(MUTED_COLOR)),
            );
        }
    }

    for node in &elements.nodes {
        let below = Point::new(
            node.position.x,
            node.position.y + NODE_RADIUS + viewport.units_per_row(),
        );
        print_centered(ctx, viewport, bounds, below, node_label(node, selected));
    }
}

fn node_label(node: &GraphNode, selected: Option<&str>) -> Line<'static> {
    let mut style = Style::default().fg(node_color(node.role));
    if node.is_root {
        style = style.add_modifier(Modifier::BOLD);
    }
    if selected == Some(node.id.as_str()) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::styled(node.label.clone(), style)
}

/// Prints `line` horizontally centred on graph point `at`, shifted inwards
/// when it would start outside the visible area.
fn print_centered(
    ctx: &mut Context<'_>,
    viewport: &Viewport,
    bounds: &Bounds,
    at: Point,
    line: Line<'static>,
) {
    let width = line.width() as f64 * viewport.units_per_col;
    let x = (at.x - width / 2.0)
        .min(bounds.max_x - width)
        .max(bounds.min_x);
    ctx.print(x, -at.y, line);
}

// ============================================================================
// Tests
// ============================================================================
