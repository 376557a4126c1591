//! Filter field editing, clipboard and browser actions.

use tracing::{info, warn};

use super::platform::clipboard;
use super::ui_state::{TOAST_TICKS, cycle_option, format_time_input, parse_time_input};
use super::{Action, App, EditTarget, FilterRow, Focus};

impl App {
    /// Confirms the active edit, or starts editing the focused filter row.
    pub(crate) fn submit(&mut self) {
        if let Some((target, text)) = self.ui.finish_edit() {
            self.apply_edit(target, text);
            return;
        }
        if self.ui.focus != Focus::Filters {
            return;
        }

        let filter = self.session.filter();
        match self.ui.current_filter_row(self.session.drafts().len()) {
            FilterRow::Coin => self.cycle_filter_option(true),
            FilterRow::Start => {
                let initial = format_time_input(filter.start);
                self.ui.begin_edit(EditTarget::Start, initial);
            }
            FilterRow::End => {
                let initial = format_time_input(filter.end);
                self.ui.begin_edit(EditTarget::End, initial);
            }
            FilterRow::Rule(index) => {
                let initial = self
                    .session
                    .drafts()
                    .get(index)
                    .map(|d| d.min_amount.clone())
                    .unwrap_or_default();
                self.ui.begin_edit(EditTarget::RuleMin(index), initial);
            }
        }
    }

    fn apply_edit(&mut self, target: EditTarget, text: String) {
        match target {
            EditTarget::Address => {
                self.ui.focus = Focus::Graph;
                self.dispatch(Action::LoadRequested(text));
            }
            EditTarget::Start | EditTarget::End => match parse_time_input(&text) {
                Ok(bound) => {
                    let bound = match self.session.auto_window() {
                        Some((lo, hi)) => bound.map(|v| v.clamp(lo, hi)),
                        None => bound,
                    };
                    let filter = self.session.filter();
                    let (start, end) = if target == EditTarget::Start {
                        (bound, filter.end)
                    } else {
                        (filter.start, bound)
                    };
                    self.dispatch(Action::SetTimeWindow { start, end });
                }
                Err(message) => self.ui.show_toast(format!("[x] {message}"), TOAST_TICKS),
            },
            EditTarget::RuleMin(index) => self.dispatch(Action::SetDraftMin {
                index,
                min_amount: text.trim().to_string(),
            }),
        }
    }

    /// Steps the coin of the focused filter row.
    pub(crate) fn cycle_filter_option(&mut self, forward: bool) {
        if self.ui.focus != Focus::Filters {
            return;
        }
        let options = self.session.coin_options();
        match self.ui.current_filter_row(self.session.drafts().len()) {
            FilterRow::Coin => {
                let coin = cycle_option(options, self.session.filter().coin.as_deref(), forward);
                self.dispatch(Action::SetCoinFilter(coin));
            }
            FilterRow::Rule(index) => {
                let current = self
                    .session
                    .drafts()
                    .get(index)
                    .map(|d| d.coin.as_str())
                    .filter(|c| !c.is_empty());
                let coin = cycle_option(options, current, forward).unwrap_or_default();
                self.dispatch(Action::SetDraftCoin { index, coin });
            }
            FilterRow::Start | FilterRow::End => {}
        }
    }

    pub(crate) fn remove_rule_under_cursor(&mut self) {
        if let FilterRow::Rule(index) = self.ui.current_filter_row(self.session.drafts().len()) {
            self.dispatch(Action::RemoveDraftRule(index));
        }
    }

    // ========================================================================
    // Detail Row Actions
    // ========================================================================

    pub(crate) fn copy_selected_counterparty(&mut self) {
        let Some(row) = self.session.detail().get(self.ui.detail_index) else {
            return;
        };
        let address = row.counterparty.clone();
        match clipboard::copy_text(&address) {
            Ok(()) => {
                info!(%address, "copied address");
                self.ui
                    .show_toast(format!("[+] Copied {}", row.counterparty_label), TOAST_TICKS);
            }
            Err(error) => {
                warn!(%error, "clipboard copy failed");
                self.ui.show_toast(format!("[x] {error}"), TOAST_TICKS);
            }
        }
    }

    pub(crate) fn open_selected_digest(&mut self) {
        let Some(row) = self.session.detail().get(self.ui.detail_index) else {
            return;
        };
        let Some(digest) = row.digest.as_deref() else {
            self.ui.show_toast("[x] No digest for this transfer", TOAST_TICKS);
            return;
        };
        let url = self.config.explorer_link(digest);
        match open::that(&url) {
            Ok(()) => self.ui.show_toast("[+] Opened in browser", TOAST_TICKS),
            Err(error) => {
                warn!(%url, %error, "failed to open browser");
                self.ui
                    .show_toast(format!("[x] Failed to open browser: {error}"), TOAST_TICKS);
            }
        }
    }
}
