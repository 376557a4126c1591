//! Keyboard and mouse input, mapped to commands and executed against the
//! session and UI state.

use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use super::{Action, App, EditTarget, Focus};
use crate::commands::{AppCommand, InputContext, map_key};
use crate::graph::viewport::{PAN_STEP_COLS, ZOOM_STEP};
use crate::graph::{ClickEvent, Point};

impl App {
    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) {
        let context = self.input_context();
        let command = map_key(key_event, &context);
        self.execute_command(command);
    }

    /// Which bindings are active for the current state.
    #[must_use]
    pub fn input_context(&self) -> InputContext {
        match self.ui.editing {
            Some(EditTarget::Address) => InputContext::AddressInput,
            Some(_) => InputContext::FieldEdit,
            None => match self.ui.focus {
                Focus::Graph => InputContext::Graph,
                Focus::Filters => InputContext::Filters,
                Focus::Transactions => InputContext::Transactions,
            },
        }
    }

    pub(crate) fn execute_command(&mut self, command: AppCommand) {
        match command {
            // === Application Control ===
            AppCommand::Quit => self.exit = true,
            AppCommand::Dismiss => {
                if self.session.error().is_some() {
                    self.dispatch(Action::DismissError);
                } else if self.session.selected().is_some() {
                    self.dispatch(Action::SelectNode(None));
                }
            }
            AppCommand::Reload => {
                if let Some(root) = self.session.root().map(str::to_string) {
                    self.dispatch(Action::LoadRequested(root));
                }
            }

            // === Focus and Text Input ===
            AppCommand::CycleFocus => self.ui.cycle_focus(),
            AppCommand::EditAddress => self.ui.begin_edit(EditTarget::Address, ""),
            AppCommand::TypeChar(c) => self.ui.type_char(c),
            AppCommand::Backspace => self.ui.backspace(),
            AppCommand::Submit => self.submit(),
            AppCommand::CancelEdit => self.ui.cancel_edit(),

            // === Lists ===
            AppCommand::MoveUp | AppCommand::MoveDown => {
                let down = command == AppCommand::MoveDown;
                match self.ui.focus {
                    Focus::Filters => self.ui.move_filter_row(down, self.session.drafts().len()),
                    Focus::Transactions => self.ui.move_detail(down, self.session.detail().len()),
                    Focus::Graph => {}
                }
            }
            AppCommand::PrevOption => self.cycle_filter_option(false),
            AppCommand::NextOption => self.cycle_filter_option(true),

            // === Graph ===
            AppCommand::PanLeft => self.ui.viewport.pan(-PAN_STEP_COLS, 0.0),
            AppCommand::PanRight => self.ui.viewport.pan(PAN_STEP_COLS, 0.0),
            AppCommand::PanUp => self.ui.viewport.pan(0.0, -PAN_STEP_COLS / 2.0),
            AppCommand::PanDown => self.ui.viewport.pan(0.0, PAN_STEP_COLS / 2.0),
            AppCommand::ZoomIn => self.ui.viewport.zoom(1.0 / ZOOM_STEP),
            AppCommand::ZoomOut => self.ui.viewport.zoom(ZOOM_STEP),
            AppCommand::FitView => self.fit_view(),
            AppCommand::ExpandSelected => {
                if let Some(id) = self.session.selected().map(str::to_string) {
                    self.dispatch(Action::ExpandRequested(id));
                }
            }

            // === Creator Scan ===
            AppCommand::ScanCreators => self.dispatch(Action::ScanRequested),
            AppCommand::ClearScan => self.dispatch(Action::ClearScanResults),

            // === Rules ===
            AppCommand::AddRule => {
                self.dispatch(Action::AddDraftRule);
                self.ui.filter_row = 2 + self.session.drafts().len();
            }
            AppCommand::RemoveRule => self.remove_rule_under_cursor(),
            AppCommand::ApplyRules => self.dispatch(Action::ApplyRules),

            // === Detail Rows ===
            AppCommand::CopyAddress => self.copy_selected_counterparty(),
            AppCommand::OpenExplorer => self.open_selected_digest(),

            AppCommand::Noop => {}
        }
    }

    // ========================================================================
    // Mouse
    // ========================================================================

    pub(crate) fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        let area = self.ui.graph_area;
        let at = self
            .ui
            .viewport
            .cell_to_world(area, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(at) = at else {
                    return;
                };
                self.ui.focus = Focus::Graph;
                let hit = self.node_at(at);
                if let Some(id) = hit {
                    let events = self.clicks.tap(&id, now);
                    self.handle_clicks(events);
                    self.dispatch(Action::GrabNode { id, at });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(at) = at
                    && self.session.is_dragging()
                {
                    self.dispatch(Action::DragTo(at));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.session.is_dragging() {
                    self.dispatch(Action::ReleaseNode);
                }
            }
            MouseEventKind::ScrollUp if at.is_some() => self.ui.viewport.zoom(1.0 / ZOOM_STEP),
            MouseEventKind::ScrollDown if at.is_some() => self.ui.viewport.zoom(ZOOM_STEP),
            _ => {}
        }
    }

    /// Node under graph point `at`.
    fn node_at(&self, at: Point) -> Option<String> {
        let nodes = self
            .session
            .elements()
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.position));
        self.ui.viewport.hit_test(nodes, at).map(str::to_string)
    }

    /// Fires a single click whose double-click window has passed.
    pub(crate) fn poll_clicks(&mut self, now: Instant) {
        if !self.clicks.is_pending() {
            return;
        }
        if let Some(event) = self.clicks.poll(now) {
            self.handle_clicks(vec![event]);
        }
    }

    fn handle_clicks(&mut self, events: Vec<ClickEvent>) {
        for event in events {
            match event {
                ClickEvent::Select(id) => {
                    self.ui.detail_index = 0;
                    self.dispatch(Action::SelectNode(Some(id)));
                }
                ClickEvent::Expand(id) => self.dispatch(Action::ExpandRequested(id)),
            }
        }
    }
}
