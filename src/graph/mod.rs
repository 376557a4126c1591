//! Transaction graph model: layout, filtering, element building and
//! interaction handling.
//!
//! # Module Organization
//!
//! - [`layout`] - Ring layout engine and radial push-out on expansion
//! - [`filter`] - Time window, coin filter and per-coin minimum rules
//! - [`builder`] - Aggregates transfers into renderable nodes and edges
//! - [`interaction`] - Click/double-click disambiguation and group drag
//! - [`viewport`] - Mapping between terminal cells and graph coordinates

use std::collections::HashMap;

pub mod builder;
pub mod filter;
pub mod interaction;
pub mod layout;
pub mod viewport;

pub use builder::GraphBuilder;
pub use filter::{CoinRule, DraftRule, FilterState};
pub use interaction::{ClickEvent, ClickTracker, DragState};
pub use layout::Point;
pub use viewport::Viewport;

// ============================================================================
// Shared Types
// ============================================================================

/// Node identifier: the address string.
pub type NodeId = String;

/// Last known position of every node, owned by the caller of the builder.
pub type Positions = HashMap<NodeId, Point>;

/// Anchor id to the ids revealed by expanding it, in reveal order.
pub type ExpansionGroups = HashMap<NodeId, Vec<NodeId>>;

/// Display role of a node. Creator takes precedence over named, named over
/// root, root over default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The address the session is centred on.
    Root,
    /// Address that created at least one coin.
    Creator,
    /// Address with a resolved name.
    Named,
    /// Any other address.
    Default,
}

/// A renderable node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Address of the node.
    pub id: NodeId,
    /// Truncated name or shortened address.
    pub label: String,
    /// Display role (drives fill and text colors).
    pub role: NodeRole,
    /// Whether this node is the session root, regardless of role precedence.
    pub is_root: bool,
    /// Position on the graph plane.
    pub position: Point,
}

/// Edge color semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Flows into the root or a previously expanded anchor.
    Receive,
    /// Any other flow.
    Flow,
}

/// A renderable edge aggregating all transfers of one `(source, target, coin)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    /// `source|target|coin` identifier.
    pub id: String,
    /// Sending address.
    pub source: NodeId,
    /// Receiving address.
    pub target: NodeId,
    /// Full coin type.
    pub coin_type: String,
    /// Lowercased coin symbol.
    pub symbol: String,
    /// Number of aggregated transfers.
    pub count: usize,
    /// Sum of human-scaled amounts.
    pub total: f64,
    /// `"{count} tx{s}: {total} {symbol}"`.
    pub label: String,
    /// Color semantics.
    pub kind: EdgeKind,
}

/// Flat element set handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphElements {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphElements {
    /// Returns true if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Node ids in element order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Expansion request applied while building the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionDirective {
    /// Node that was expanded.
    pub anchor_id: NodeId,
    /// Session root used as the push-out origin.
    pub root_id: NodeId,
    /// Ids revealed by this expansion, ringed around the pushed anchor.
    pub new_ids: Vec<NodeId>,
    /// Bump level of the anchor after this expansion (1 on first expansion).
    pub bump_level: u32,
}
