//! Graph interaction: single vs double click, and group drag.
//!
//! The click tracker is a small state machine driven by the caller's
//! monotonic clock, so it runs without timers: taps report immediate double
//! clicks and [`ClickTracker::poll`] reports single clicks once the threshold
//! has elapsed unchallenged.

use std::time::{Duration, Instant};

use super::layout::Point;
use super::{ExpansionGroups, NodeId, Positions};

// ============================================================================
// Constants
// ============================================================================

/// Default window for a second tap to count as a double click.
pub const DEFAULT_DOUBLE_CLICK: Duration = Duration::from_millis(280);

// ============================================================================
// Click Disambiguation
// ============================================================================

/// Resolved click intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEvent {
    /// Single click: select the node (drives the detail panel).
    Select(NodeId),
    /// Double click: expand the graph around the node.
    Expand(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickState {
    Idle,
    PendingSingle { node: NodeId, tapped_at: Instant },
}

/// Disambiguates single and double clicks on graph nodes.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    state: ClickState,
    threshold: Duration,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK)
    }
}

impl ClickTracker {
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self {
            state: ClickState::Idle,
            threshold,
        }
    }

    /// Returns true while a single click is waiting for its deadline.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, ClickState::PendingSingle { .. })
    }

    /// Registers a tap on `node` at `now`.
    ///
    /// A second tap on the same node within the threshold yields
    /// [`ClickEvent::Expand`] and cancels the pending single click. Any other
    /// tap arms a new pending single click; a still-running pending click on a
    /// different node is dropped, while one whose deadline already passed
    /// without being polled is reported first.
    pub fn tap(&mut self, node: &str, now: Instant) -> Vec<ClickEvent> {
        let mut events = Vec::new();

        if let ClickState::PendingSingle {
            node: pending,
            tapped_at,
        } = std::mem::replace(&mut self.state, ClickState::Idle)
        {
            let elapsed = now.saturating_duration_since(tapped_at);
            if elapsed <= self.threshold {
                if pending == node {
                    events.push(ClickEvent::Expand(pending));
                    return events;
                }
            } else {
                events.push(ClickEvent::Select(pending));
            }
        }

        self.state = ClickState::PendingSingle {
            node: node.to_string(),
            tapped_at: now,
        };
        events
    }

    /// Reports the pending single click once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ClickEvent> {
        let ClickState::PendingSingle { tapped_at, .. } = &self.state else {
            return None;
        };
        if now.saturating_duration_since(*tapped_at) <= self.threshold {
            return None;
        }
        match std::mem::replace(&mut self.state, ClickState::Idle) {
            ClickState::PendingSingle { node, .. } => Some(ClickEvent::Select(node)),
            ClickState::Idle => None,
        }
    }

    /// Drops any pending click.
    pub fn cancel(&mut self) {
        self.state = ClickState::Idle;
    }
}

// ============================================================================
// Group Drag
// ============================================================================

/// Drag session: the grabbed node moves, and its expansion group follows.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    anchor: Option<NodeId>,
    last: Option<Point>,
    followers: Vec<NodeId>,
    moved: bool,
}

impl DragState {
    /// Grabs `anchor` with the pointer at `position`, capturing its expansion
    /// group as followers.
    pub fn grab(&mut self, anchor: &str, position: Point, groups: &ExpansionGroups) {
        self.followers = groups
            .get(anchor)
            .map(|members| {
                members
                    .iter()
                    .filter(|id| id.as_str() != anchor)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        self.anchor = Some(anchor.to_string());
        self.last = Some(position);
        self.moved = false;
    }

    /// Currently grabbed node.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Returns true if the anchor moved since it was grabbed.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Applies the pointer delta since the last call to the anchor and to
    /// every follower that has a position. Returns false if nothing is grabbed.
    pub fn drag_to(&mut self, position: Point, positions: &mut Positions) -> bool {
        let (Some(anchor), Some(last)) = (self.anchor.as_ref(), self.last) else {
            return false;
        };
        let dx = position.x - last.x;
        let dy = position.y - last.y;
        self.last = Some(position);
        if dx == 0.0 && dy == 0.0 {
            return true;
        }
        self.moved = true;

        for id in std::iter::once(anchor).chain(&self.followers) {
            if let Some(p) = positions.get_mut(id) {
                *p = p.offset(dx, dy);
            }
        }
        true
    }

    /// Releases the grabbed node. Returns whether it was moved.
    pub fn release(&mut self) -> bool {
        let moved = self.moved;
        *self = Self::default();
        moved
    }
}

// ============================================================================
// Tests
// ============================================================================
