//! Graph session: every piece of state behind the bubble map, updated by a
//! single reducer.
//!
//! [`Session::reduce`] applies an [`Action`] and returns a [`Transition`]: the
//! derived recompute steps to run, in fixed order (filter, rebuild graph,
//! refresh detail), plus the side-effect [`Command`]s the caller must carry
//! out (network fetches, name lookups, scans). [`Session::dispatch`] does both
//! steps and hands back only the commands.

use std::collections::HashMap;

use chrono::DateTime;

use crate::domain::coin::format_amount;
use crate::domain::coin::symbol_of;
use crate::domain::transfer::{
    coin_symbols, counterparties, dedup_transfers, merge_transfers, padded_time_window,
};
use crate::domain::{CreatedCoin, CreatorRegistry, NameCache, Transfer, normalize_address};
use crate::graph::filter::{self, commit_drafts};
use crate::graph::{
    CoinRule, DraftRule, DragState, ExpansionDirective, ExpansionGroups, FilterState,
    GraphBuilder, GraphElements, NodeId, Point, Positions,
};
use crate::services::{NameResolved, ScanReport};

#[cfg(test)]
mod tests;

// ============================================================================
// Constants
// ============================================================================

/// Inline message shown when a load is requested without an address.
pub const EMPTY_ADDRESS_MESSAGE: &str = "Please enter a wallet address";

// ============================================================================
// Actions, Steps and Commands
// ============================================================================

/// How a fetched batch is merged into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    /// Full reload: the address becomes the new root.
    Replace,
    /// Expansion anchored at a node of the current graph.
    Expand { anchor: NodeId },
}

/// Everything that can change the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user asked to load an address.
    LoadRequested(String),
    /// A transfer fetch succeeded.
    TransfersLoaded {
        address: String,
        mode: FetchMode,
        transfers: Vec<Transfer>,
    },
    /// A transfer fetch failed.
    TransfersFailed {
        address: String,
        mode: FetchMode,
        message: String,
    },
    /// Double click on a node.
    ExpandRequested(NodeId),
    /// Single click on a node (or `None` to clear the selection).
    SelectNode(Option<NodeId>),
    /// Global coin filter; `None` or empty shows every coin.
    SetCoinFilter(Option<String>),
    /// Time window bounds in milliseconds.
    SetTimeWindow {
        start: Option<i64>,
        end: Option<i64>,
    },
    /// Appends an empty draft rule.
    AddDraftRule,
    /// Sets the coin of a draft rule.
    SetDraftCoin { index: usize, coin: String },
    /// Sets the typed minimum of a draft rule.
    SetDraftMin { index: usize, min_amount: String },
    /// Removes a draft rule; committed rules for its coin are dropped too.
    RemoveDraftRule(usize),
    /// Commits the draft rules.
    ApplyRules,
    /// A name lookup settled.
    NameResolved(NameResolved),
    /// The user asked for a creator scan of the current nodes.
    ScanRequested,
    /// One address of a running scan finished.
    ScanProgress {
        address: String,
        coins: Vec<CreatedCoin>,
        done: usize,
        total: usize,
    },
    /// The running scan finished.
    ScanFinished(ScanReport),
    /// Clears the inline scan result list.
    ClearScanResults,
    /// Hides the error banner.
    DismissError,
    /// Starts dragging a node with the pointer at `at`.
    GrabNode { id: NodeId, at: Point },
    /// Pointer moved while dragging.
    DragTo(Point),
    /// Pointer released.
    ReleaseNode,
}

/// Derived state refresh, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Recompute {
    /// Re-run the transaction filter over the merged set.
    Filter,
    /// Rebuild nodes and edges from the filtered set.
    RebuildGraph,
    /// Refresh the detail rows of the selected node.
    RefreshDetail,
}

/// Side effect requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the transfers of `address`.
    FetchTransfers { address: String, mode: FetchMode },
    /// Queue addresses for name resolution.
    ResolveNames(Vec<String>),
    /// Start a creator scan over the addresses.
    ScanCreators(Vec<String>),
}

/// Outcome of [`Session::reduce`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub recompute: Vec<Recompute>,
    pub commands: Vec<Command>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn all() -> Self {
        Self::steps(&[
            Recompute::Filter,
            Recompute::RebuildGraph,
            Recompute::RefreshDetail,
        ])
    }

    fn steps(steps: &[Recompute]) -> Self {
        let mut recompute = steps.to_vec();
        recompute.sort();
        recompute.dedup();
        Self {
            recompute,
            commands: Vec::new(),
        }
    }

    fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

// ============================================================================
// Presentation Types
// ============================================================================

/// Creator scan progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning { done: usize, total: usize },
    Done { creators: usize },
}

/// One row of the selected node's transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub timestamp_ms: i64,
    /// True when the selected node sent the transfer.
    pub outgoing: bool,
    pub counterparty: String,
    /// Resolved name or short address of the counterparty.
    pub counterparty_label: String,
    /// Whole-number amount with thousands separators and symbol.
    pub amount: String,
    pub digest: Option<String>,
}

impl DetailRow {
    /// `YYYY-MM-DD HH:MM` in UTC, or `-` for unrepresentable timestamps.
    #[must_use]
    pub fn date(&self) -> String {
        DateTime::from_timestamp_millis(self.timestamp_ms)
            .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
    }

    #[must_use]
    pub fn direction_label(&self) -> &'static str {
        if self.outgoing { "OUT" } else { "IN" }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Bubble map session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    root: Option<NodeId>,
    transfers: Vec<Transfer>,
    filtered: Vec<usize>,

    filter: FilterState,
    rules: Vec<CoinRule>,
    drafts: Vec<DraftRule>,
    auto_window: Option<(i64, i64)>,
    coin_options: Vec<String>,

    names: NameCache,
    creators: CreatorRegistry,
    scan: ScanStatus,
    scan_results: Vec<(String, Vec<CreatedCoin>)>,

    positions: Positions,
    expansion_groups: ExpansionGroups,
    bump_levels: HashMap<NodeId, u32>,
    pending_expansion: Option<ExpansionDirective>,
    drag: DragState,
    elements: GraphElements,

    selected: Option<NodeId>,
    detail: Vec<DetailRow>,

    loading: bool,
    expanding: Vec<NodeId>,
    error: Option<String>,
    validation: Option<String>,
    needs_fit: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `action` and runs the resulting recompute steps.
    ///
    /// Returns the commands the caller must carry out.
    pub fn dispatch(&mut self, action: Action) -> Vec<Command> {
        let transition = self.reduce(action);
        self.apply(&transition.recompute);
        transition.commands
    }

    /// Applies `action` to primary state without running derived steps.
    pub fn reduce(&mut self, action: Action) -> Transition {
        match action {
            Action::LoadRequested(input) => self.on_load_requested(&input),
            Action::TransfersLoaded {
                address,
                mode: FetchMode::Replace,
                transfers,
            } => self.on_replace(address, &transfers),
            Action::TransfersLoaded {
                mode: FetchMode::Expand { anchor },
                transfers,
                ..
            } => self.on_expand(anchor, &transfers),
            Action::TransfersFailed { mode, message, .. } => {
                match mode {
                    FetchMode::Replace => self.loading = false,
                    FetchMode::Expand { anchor } => {
                        if !self.expanding.contains(&anchor) {
                            return Transition::none();
                        }
                        self.expanding.retain(|a| *a != anchor);
                    }
                }
                self.error = Some(message);
                Transition::none()
            }
            Action::ExpandRequested(anchor) => {
                if self.root.is_none() || self.expanding.contains(&anchor) {
                    return Transition::none();
                }
                self.expanding.push(anchor.clone());
                Transition::none().command(Command::FetchTransfers {
                    address: anchor.clone(),
                    mode: FetchMode::Expand { anchor },
                })
            }
            Action::SelectNode(id) => {
                self.selected = id;
                Transition::steps(&[Recompute::RefreshDetail])
            }
            Action::SetCoinFilter(coin) => {
                self.filter.set_coin(coin.as_deref());
                Transition::all()
            }
            Action::SetTimeWindow { start, end } => {
                self.filter.start = start;
                self.filter.end = end;
                Transition::all()
            }
            Action::AddDraftRule => {
                self.drafts.push(DraftRule::default());
                Transition::none()
            }
            Action::SetDraftCoin { index, coin } => {
                if let Some(draft) = self.drafts.get_mut(index) {
                    draft.coin = coin;
                }
                Transition::none()
            }
            Action::SetDraftMin { index, min_amount } => {
                if let Some(draft) = self.drafts.get_mut(index) {
                    draft.min_amount = min_amount;
                }
                Transition::none()
            }
            Action::RemoveDraftRule(index) => self.on_remove_draft(index),
            Action::ApplyRules => {
                self.rules = commit_drafts(&self.drafts);
                Transition::all()
            }
            Action::NameResolved(resolved) => {
                if self.names.insert(resolved.address, resolved.name) {
                    Transition::steps(&[Recompute::RebuildGraph, Recompute::RefreshDetail])
                } else {
                    Transition::none()
                }
            }
            Action::ScanRequested => {
                if self.is_scanning() || self.elements.nodes.is_empty() {
                    return Transition::none();
                }
                let addresses = self.elements.node_ids();
                self.scan = ScanStatus::Scanning {
                    done: 0,
                    total: addresses.len(),
                };
                self.scan_results.clear();
                Transition::none().command(Command::ScanCreators(addresses))
            }
            Action::ScanProgress {
                address,
                coins,
                done,
                total,
            } => self.on_scan_progress(address, coins, done, total),
            Action::ScanFinished(report) => {
                self.creators.merge(&report.registry);
                self.scan = ScanStatus::Done {
                    creators: report.registry.creator_count(),
                };
                Transition::steps(&[Recompute::RebuildGraph])
            }
            Action::ClearScanResults => {
                self.scan_results.clear();
                if !self.is_scanning() {
                    self.scan = ScanStatus::Idle;
                }
                Transition::none()
            }
            Action::DismissError => {
                self.error = None;
                Transition::none()
            }
            Action::GrabNode { id, at } => {
                self.drag.grab(&id, at, &self.expansion_groups);
                Transition::none()
            }
            Action::DragTo(at) => {
                if self.drag.drag_to(at, &mut self.positions) && self.drag.has_moved() {
                    Transition::steps(&[Recompute::RebuildGraph])
                } else {
                    Transition::none()
                }
            }
            Action::ReleaseNode => {
                self.drag.release();
                Transition::none()
            }
        }
    }

    /// Runs derived recompute steps in their canonical order.
    pub fn apply(&mut self, steps: &[Recompute]) {
        let mut steps = steps.to_vec();
        steps.sort();
        steps.dedup();
        for step in steps {
            match step {
                Recompute::Filter => self.refilter(),
                Recompute::RebuildGraph => self.rebuild_graph(),
                Recompute::RefreshDetail => self.refresh_detail(),
            }
        }
    }

    // ========================================================================
    // Reducer Branches
    // ========================================================================

    fn on_load_requested(&mut self, input: &str) -> Transition {
        let address = normalize_address(input);
        if address.is_empty() {
            self.validation = Some(EMPTY_ADDRESS_MESSAGE.to_string());
            return Transition::none();
        }
        self.validation = None;
        self.error = None;
        self.loading = true;
        Transition::none().command(Command::FetchTransfers {
            address,
            mode: FetchMode::Replace,
        })
    }

    fn on_replace(&mut self, address: String, fresh: &[Transfer]) -> Transition {
        self.loading = false;
        self.error = None;
        self.transfers = dedup_transfers(fresh);

        self.positions.clear();
        self.bump_levels.clear();
        self.expanding.clear();
        self.pending_expansion = None;
        self.drag.release();
        self.expansion_groups.clear();
        self.expansion_groups
            .insert(address.clone(), counterparties(&self.transfers, &address));
        if self
            .selected
            .as_ref()
            .is_some_and(|s| !self.transfers.iter().any(|t| t.involves(s)) && *s != address)
        {
            self.selected = None;
        }
        self.root = Some(address);
        self.needs_fit = true;

        self.refresh_window(true);
        self.coin_options = coin_symbols(&self.transfers);

        let names = self.unresolved_endpoints(&self.transfers);
        let mut transition = Transition::all();
        if !names.is_empty() {
            transition = transition.command(Command::ResolveNames(names));
        }
        transition
    }

    fn on_expand(&mut self, anchor: NodeId, fresh: &[Transfer]) -> Transition {
        // A reload in the meantime clears `expanding`; drop the stale batch.
        if !self.expanding.contains(&anchor) {
            return Transition::none();
        }
        self.expanding.retain(|a| *a != anchor);
        let Some(root) = self.root.clone() else {
            return Transition::none();
        };

        let fresh = dedup_transfers(fresh);
        self.transfers = merge_transfers(&self.transfers, &fresh);

        let bump = self.bump_levels.entry(anchor.clone()).or_insert(0);
        *bump += 1;
        let bump_level = *bump;

        let new_ids: Vec<NodeId> = counterparties(&fresh, &anchor)
            .into_iter()
            .filter(|id| !self.positions.contains_key(id) && *id != root)
            .collect();
        let group = self.expansion_groups.entry(anchor.clone()).or_default();
        for id in &new_ids {
            if !group.contains(id) {
                group.push(id.clone());
            }
        }
        self.pending_expansion = Some(ExpansionDirective {
            anchor_id: anchor,
            root_id: root,
            new_ids,
            bump_level,
        });

        self.refresh_window(false);
        self.coin_options = coin_symbols(&self.transfers);

        let names = self.unresolved_endpoints(&fresh);
        let mut transition = Transition::all();
        if !names.is_empty() {
            transition = transition.command(Command::ResolveNames(names));
        }
        transition
    }

    fn on_remove_draft(&mut self, index: usize) -> Transition {
        if index >= self.drafts.len() {
            return Transition::none();
        }
        let removed = self.drafts.remove(index);
        let coin = removed.coin.trim().to_lowercase();
        if coin.is_empty() {
            return Transition::none();
        }
        self.rules.retain(|rule| rule.coin != coin);
        Transition::all()
    }

    fn on_scan_progress(
        &mut self,
        address: String,
        coins: Vec<CreatedCoin>,
        done: usize,
        total: usize,
    ) -> Transition {
        if self.is_scanning() {
            self.scan = ScanStatus::Scanning { done, total };
        }
        if coins.is_empty() {
            return Transition::none();
        }
        self.creators.record(&address, coins.clone());
        match self.scan_results.iter_mut().find(|(a, _)| *a == address) {
            Some((_, existing)) => *existing = coins,
            None => self.scan_results.push((address, coins)),
        }
        self.scan_results
            .sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
        Transition::steps(&[Recompute::RebuildGraph])
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    /// Updates the automatic time window; adopts it when `force` is set or the
    /// user has not customised the current window.
    fn refresh_window(&mut self, force: bool) {
        let previous = self.auto_window;
        let current = (self.filter.start, self.filter.end);
        let untouched = current == (None, None)
            || previous.is_some_and(|(start, end)| current == (Some(start), Some(end)));

        self.auto_window = padded_time_window(&self.transfers);
        if force || untouched {
            self.filter.start = self.auto_window.map(|(start, _)| start);
            self.filter.end = self.auto_window.map(|(_, end)| end);
        }
    }

    fn unresolved_endpoints(&self, transfers: &[Transfer]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = self
            .root
            .iter()
            .map(String::as_str)
            .chain(transfers.iter().flat_map(|t| [t.from.as_str(), t.to.as_str()]));
        for address in candidates {
            if !self.names.is_settled(address) && !out.iter().any(|a| a == address) {
                out.push(address.to_string());
            }
        }
        out
    }

    fn refilter(&mut self) {
        self.filtered = filter::matching_indices(&self.transfers, &self.filter, &self.rules);
    }

    fn rebuild_graph(&mut self) {
        let Some(root) = self.root.as_deref() else {
            self.elements = GraphElements::default();
            return;
        };
        let visible: Vec<&Transfer> = self
            .filtered
            .iter()
            .filter_map(|&i| self.transfers.get(i))
            .collect();
        let directive = self.pending_expansion.take();
        let built = GraphBuilder::new(&self.names, &self.creators, &self.expansion_groups).build(
            &visible,
            root,
            &self.positions,
            directive.as_ref(),
        );
        self.positions = built.positions;
        self.elements = built.elements;
    }

    fn refresh_detail(&mut self) {
        let Some(selected) = self.selected.as_deref() else {
            self.detail.clear();
            return;
        };
        let mut rows: Vec<DetailRow> = self
            .filtered
            .iter()
            .filter_map(|&i| self.transfers.get(i))
            .filter(|t| t.involves(selected))
            .map(|t| {
                let outgoing = t.from.eq_ignore_ascii_case(selected);
                let counterparty = if outgoing { &t.to } else { &t.from };
                DetailRow {
                    timestamp_ms: t.timestamp_ms,
                    outgoing,
                    counterparty: counterparty.clone(),
                    counterparty_label: self.names.label(counterparty),
                    amount: format!("{} {}", format_amount(t.amount, &t.coin), symbol_of(&t.coin)),
                    digest: t.digest.clone(),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        self.detail = rows;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Number of transfers passing the current filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn rules(&self) -> &[CoinRule] {
        &self.rules
    }

    #[must_use]
    pub fn drafts(&self) -> &[DraftRule] {
        &self.drafts
    }

    /// Allowed input range for the time window.
    #[must_use]
    pub fn auto_window(&self) -> Option<(i64, i64)> {
        self.auto_window
    }

    #[must_use]
    pub fn coin_options(&self) -> &[String] {
        &self.coin_options
    }

    #[must_use]
    pub fn names(&self) -> &NameCache {
        &self.names
    }

    #[must_use]
    pub fn creators(&self) -> &CreatorRegistry {
        &self.creators
    }

    #[must_use]
    pub fn scan_status(&self) -> ScanStatus {
        self.scan
    }

    #[must_use]
    pub fn is_scanning(&self) -> bool {
        matches!(self.scan, ScanStatus::Scanning { .. })
    }

    /// Creators found by the current scan, most coins first.
    #[must_use]
    pub fn scan_results(&self) -> &[(String, Vec<CreatedCoin>)] {
        &self.scan_results
    }

    #[must_use]
    pub fn elements(&self) -> &GraphElements {
        &self.elements
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn detail(&self) -> &[DetailRow] {
        &self.detail
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_expanding(&self) -> bool {
        !self.expanding.is_empty()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.anchor().is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Returns true once after a full reload, so the view can refit.
    pub fn take_needs_fit(&mut self) -> bool {
        std::mem::take(&mut self.needs_fit)
    }
}
