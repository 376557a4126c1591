//! Graph builder: filtered transfers to a deduplicated node/edge element set.
//!
//! Positions are passed in and returned rather than read from the render
//! surface. Nodes that already have a position keep it; a first build with an
//! empty position map rings every node around the root at the origin.

use std::collections::{HashMap, HashSet};

use crate::domain::coin::{format_int, human_amount, symbol_of};
use crate::domain::{CreatorRegistry, NameCache, Transfer};

use super::layout::{
    EDGE_GROWTH_PER_BUMP, EFFECTIVE_DIAMETER, EXPANSION_RING_MIN_RADIUS, NODE_GAP, Point,
    ROOT_RING_MIN_RADIUS, RingSpec, expand_push, place_ring,
};
use super::{
    EdgeKind, ExpansionDirective, ExpansionGroups, GraphEdge, GraphElements, GraphNode, NodeId,
    NodeRole, Positions,
};

// ============================================================================
// Output
// ============================================================================

/// Result of a build: elements plus the updated position map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltGraph {
    pub elements: GraphElements,
    pub positions: Positions,
}

// ============================================================================
// Builder
// ============================================================================

/// Builds graph elements against the current name, creator and group state.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    names: &'a NameCache,
    creators: &'a CreatorRegistry,
    expansion_groups: &'a ExpansionGroups,
}

#[derive(Debug)]
struct EdgeAccumulator {
    source: NodeId,
    target: NodeId,
    coin_type: String,
    count: usize,
    total: f64,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(
        names: &'a NameCache,
        creators: &'a CreatorRegistry,
        expansion_groups: &'a ExpansionGroups,
    ) -> Self {
        Self {
            names,
            creators,
            expansion_groups,
        }
    }

    /// Builds the element set for `transfers` centred on `primary`.
    ///
    /// With an expansion directive only the anchor and its newly revealed ids
    /// are repositioned. Nodes that still have no position afterwards are
    /// ringed around the root just outside the current extent of the graph.
    #[must_use]
    pub fn build(
        &self,
        transfers: &[&Transfer],
        primary: &str,
        positions: &Positions,
        expansion: Option<&ExpansionDirective>,
    ) -> BuiltGraph {
        let mut node_ids: Vec<NodeId> = vec![primary.to_string()];
        let mut seen: HashSet<&str> = HashSet::from([primary]);
        let mut edges: Vec<EdgeAccumulator> = Vec::new();
        let mut edge_index: HashMap<(&str, &str, &str), usize> = HashMap::new();

        for transfer in transfers {
            for endpoint in [transfer.from.as_str(), transfer.to.as_str()] {
                if seen.insert(endpoint) {
                    node_ids.push(endpoint.to_string());
                }
            }

            let key = (
                transfer.from.as_str(),
                transfer.to.as_str(),
                transfer.coin.as_str(),
            );
            let index = *edge_index.entry(key).or_insert_with(|| {
                edges.push(EdgeAccumulator {
                    source: transfer.from.clone(),
                    target: transfer.to.clone(),
                    coin_type: transfer.coin.clone(),
                    count: 0,
                    total: 0.0,
                });
                edges.len() - 1
            });
            let edge = &mut edges[index];
            edge.count += 1;
            edge.total += human_amount(transfer.amount, &transfer.coin);
        }

        let positions = Self::resolve_positions(&node_ids, primary, positions, expansion);

        let nodes = node_ids
            .iter()
            .map(|id| GraphNode {
                id: id.clone(),
                label: self.names.label(id),
                role: self.role_of(id, primary),
                is_root: id == primary,
                position: positions.get(id).copied().unwrap_or(Point::ORIGIN),
            })
            .collect();

        let receive_targets = self.receive_targets(primary);
        let edges = edges
            .into_iter()
            .map(|e| {
                let symbol = symbol_of(&e.coin_type);
                let plural = if e.count > 1 { "s" } else { "" };
                let label = format!("{} tx{}: {} {}", e.count, plural, format_int(e.total), symbol);
                let kind = if receive_targets.contains(&e.target.to_lowercase()) {
                    EdgeKind::Receive
                } else {
                    EdgeKind::Flow
                };
                GraphEdge {
                    id: format!("{}|{}|{}", e.source, e.target, e.coin_type),
                    source: e.source,
                    target: e.target,
                    coin_type: e.coin_type,
                    symbol,
                    count: e.count,
                    total: e.total,
                    label,
                    kind,
                }
            })
            .collect();

        BuiltGraph {
            elements: GraphElements { nodes, edges },
            positions,
        }
    }

    fn role_of(&self, id: &str, primary: &str) -> NodeRole {
        if self.creators.is_creator(id) {
            NodeRole::Creator
        } else if self.names.name(id).is_some() {
            NodeRole::Named
        } else if id == primary {
            NodeRole::Root
        } else {
            NodeRole::Default
        }
    }

    /// Lowercased root plus every expansion anchor.
    fn receive_targets(&self, primary: &str) -> HashSet<String> {
        std::iter::once(primary)
            .chain(self.expansion_groups.keys().map(String::as_str))
            .map(str::to_lowercase)
            .collect()
    }

    fn resolve_positions(
        node_ids: &[NodeId],
        primary: &str,
        known: &Positions,
        expansion: Option<&ExpansionDirective>,
    ) -> Positions {
        let mut out = known.clone();

        if known.is_empty() {
            let others: Vec<NodeId> = node_ids
                .iter()
                .filter(|id| id.as_str() != primary)
                .cloned()
                .collect();
            out.insert(primary.to_string(), Point::ORIGIN);
            if !others.is_empty() {
                let ring = place_ring(
                    Point::ORIGIN,
                    &others,
                    RingSpec::with_min_radius(ROOT_RING_MIN_RADIUS),
                );
                out.extend(ring.positions);
            }
        }

        if let Some(directive) = expansion {
            let root_pos = out
                .get(&directive.root_id)
                .copied()
                .unwrap_or(Point::ORIGIN);
            let old_pos = out
                .get(&directive.anchor_id)
                .copied()
                .unwrap_or(Point::ORIGIN);
            let center = if directive.anchor_id == directive.root_id {
                old_pos
            } else {
                expand_push(root_pos, old_pos, directive.bump_level, EDGE_GROWTH_PER_BUMP)
            };
            out.insert(directive.anchor_id.clone(), center);

            if !directive.new_ids.is_empty() {
                let ring = place_ring(
                    center,
                    &directive.new_ids,
                    RingSpec::with_min_radius(EXPANSION_RING_MIN_RADIUS),
                );
                out.extend(ring.positions);
            }
        }

        let root_pos = *out.entry(primary.to_string()).or_insert(Point::ORIGIN);
        let orphans: Vec<NodeId> = node_ids
            .iter()
            .filter(|id| !out.contains_key(*id))
            .cloned()
            .collect();
        if !orphans.is_empty() {
            let extent = node_ids
                .iter()
                .filter_map(|id| out.get(id))
                .map(|p| p.distance(root_pos))
                .fold(0.0_f64, f64::max);
            let spec = RingSpec::with_min_radius(
                (extent + EFFECTIVE_DIAMETER + NODE_GAP).max(ROOT_RING_MIN_RADIUS),
            );
            out.extend(place_ring(root_pos, &orphans, spec).positions);
        }

        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreatedCoin, Direction};
    use crate::graph::layout::required_radius;

    const SUI: &str = "0x2::sui::SUI";

    fn transfer(from: &str, to: &str, amount: u128, coin: &str) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            coin: coin.to_string(),
            timestamp_ms: 1000,
            digest: None,
            direction: Direction::Sent,
        }
    }

    struct Fixture {
        names: NameCache,
        creators: CreatorRegistry,
        groups: ExpansionGroups,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                names: NameCache::default(),
                creators: CreatorRegistry::new(),
                groups: ExpansionGroups::new(),
            }
        }

        fn builder(&self) -> GraphBuilder<'_> {
            GraphBuilder::new(&self.names, &self.creators, &self.groups)
        }
    }

    #[test]
    fn test_single_transfer_two_nodes_one_edge() {
        let fixture = Fixture::new();
        let tx = transfer("A", "B", 1_000_000_000, SUI);
        let built = fixture.builder().build(&[&tx], "A", &Positions::new(), None);

        assert_eq!(built.elements.nodes.len(), 2);
        assert_eq!(built.elements.edges.len(), 1);
        insta::assert_snapshot!(built.elements.edges[0].label, @"1 tx: 1 sui");
        assert_eq!(built.elements.edges[0].id, "A|B|0x2::sui::SUI");
    }

    #[test]
    fn test_aggregates_per_source_target_coin() {
        let fixture = Fixture::new();
        let txs = [
            transfer("A", "B", 1_500_000_000, SUI),
            transfer("A", "B", 2_000_000_000, SUI),
            transfer("A", "B", 7_000_000, "0xd::usdc::USDC"),
            transfer("B", "A", 1_000_000_000, SUI),
        ];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let built = fixture.builder().build(&refs, "A", &Positions::new(), None);

        let labels: Vec<&str> = built
            .elements
            .edges
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["2 txs: 4 sui", "1 tx: 7 usdc", "1 tx: 1 sui"]);
        assert_eq!(built.elements.edges[0].count, 2);
        assert!((built.elements.edges[0].total - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_root_seeded_without_transfers() {
        let fixture = Fixture::new();
        let built = fixture.builder().build(&[], "0xroot", &Positions::new(), None);
        assert_eq!(built.elements.nodes.len(), 1);
        assert!(built.elements.nodes[0].is_root);
        assert_eq!(built.elements.nodes[0].role, NodeRole::Root);
        assert_eq!(built.elements.nodes[0].position, Point::ORIGIN);
    }

    #[test]
    fn test_role_precedence_and_labels() {
        let mut fixture = Fixture::new();
        fixture
            .names
            .insert("0xnamed000000", Some("alice.sui".to_string()));
        fixture
            .names
            .insert("0xboth0000000", Some("bob.sui".to_string()));
        fixture
            .creators
            .record("0xBOTH0000000", vec![CreatedCoin::new("0xb::x::X", None)]);
        fixture
            .names
            .insert("0xroot0000000", Some("root.sui".to_string()));

        let txs = [
            transfer("0xroot0000000", "0xnamed000000", 1, SUI),
            transfer("0xroot0000000", "0xboth0000000", 1, SUI),
            transfer("0xroot0000000", "0xplain000000", 1, SUI),
        ];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let built = fixture
            .builder()
            .build(&refs, "0xroot0000000", &Positions::new(), None);
        let nodes = &built.elements.nodes;

        let root = built.elements.node("0xroot0000000").unwrap();
        assert!(root.is_root);
        assert_eq!(root.role, NodeRole::Named);

        let named = built.elements.node("0xnamed000000").unwrap();
        assert_eq!(named.role, NodeRole::Named);
        assert_eq!(named.label, "alice.sui..");

        assert_eq!(built.elements.node("0xboth0000000").unwrap().role, NodeRole::Creator);

        let plain = built.elements.node("0xplain000000").unwrap();
        assert_eq!(plain.role, NodeRole::Default);
        assert_eq!(plain.label, "0xp..0000");
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_edge_kind_receive_into_root_or_anchor() {
        let mut fixture = Fixture::new();
        fixture.groups.insert("0xanchor".to_string(), vec![]);
        let txs = [
            transfer("0xb", "0xROOT", 1, SUI),
            transfer("0xc", "0xanchor", 1, SUI),
            transfer("0xroot", "0xd", 1, SUI),
        ];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let built = fixture.builder().build(&refs, "0xroot", &Positions::new(), None);
        let kinds: Vec<EdgeKind> = built.elements.edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EdgeKind::Receive, EdgeKind::Receive, EdgeKind::Flow]);
    }

    #[test]
    fn test_idempotent_with_empty_positions() {
        let fixture = Fixture::new();
        let txs = [
            transfer("A", "B", 1, SUI),
            transfer("C", "A", 1, SUI),
            transfer("A", "D", 1, SUI),
        ];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let first = fixture.builder().build(&refs, "A", &Positions::new(), None);
        let second = fixture.builder().build(&refs, "A", &Positions::new(), None);
        assert_eq!(first, second);

        let root = first.elements.node("A").unwrap();
        assert_eq!(root.position, Point::ORIGIN);
        for node in first.elements.nodes.iter().filter(|n| !n.is_root) {
            assert!((node.position.distance(Point::ORIGIN) - ROOT_RING_MIN_RADIUS).abs() < 1e-6);
        }
    }

    #[test]
    fn test_known_positions_are_kept() {
        let fixture = Fixture::new();
        let tx = transfer("A", "B", 1, SUI);
        let mut positions = Positions::new();
        positions.insert("A".to_string(), Point::new(5.0, 5.0));
        positions.insert("B".to_string(), Point::new(-40.0, 12.0));

        let built = fixture.builder().build(&[&tx], "A", &positions, None);
        assert_eq!(built.elements.node("B").unwrap().position, Point::new(-40.0, 12.0));
        assert_eq!(built.positions, positions);
    }

    #[test]
    fn test_unknown_nodes_placed_outside_extent() {
        let fixture = Fixture::new();
        let txs = [transfer("A", "B", 1, SUI), transfer("A", "C", 1, SUI)];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let mut positions = Positions::new();
        positions.insert("A".to_string(), Point::ORIGIN);
        positions.insert("B".to_string(), Point::new(1000.0, 0.0));

        let built = fixture.builder().build(&refs, "A", &positions, None);
        let c = built.elements.node("C").unwrap().position;
        assert!(c.distance(Point::ORIGIN) > 1000.0);
        assert_eq!(built.elements.node("B").unwrap().position, Point::new(1000.0, 0.0));
    }

    #[test]
    fn test_expansion_moves_only_anchor_and_new_ids() {
        let fixture = Fixture::new();
        let txs = [
            transfer("R", "A", 1, SUI),
            transfer("R", "B", 1, SUI),
            transfer("A", "N1", 1, SUI),
            transfer("N2", "A", 1, SUI),
        ];
        let refs: Vec<&Transfer> = txs.iter().collect();
        let mut positions = Positions::new();
        positions.insert("R".to_string(), Point::ORIGIN);
        positions.insert("A".to_string(), Point::new(100.0, 0.0));
        positions.insert("B".to_string(), Point::new(0.0, 100.0));

        let directive = ExpansionDirective {
            anchor_id: "A".to_string(),
            root_id: "R".to_string(),
            new_ids: vec!["N1".to_string(), "N2".to_string()],
            bump_level: 1,
        };
        let built = fixture
            .builder()
            .build(&refs, "R", &positions, Some(&directive));

        let anchor = built.positions["A"];
        assert!((anchor.x - (100.0 + EDGE_GROWTH_PER_BUMP)).abs() < 1e-6);
        assert!(anchor.y.abs() < 1e-6);
        assert_eq!(built.positions["B"], Point::new(0.0, 100.0));
        assert_eq!(built.positions["R"], Point::ORIGIN);
        let ring_radius = required_radius(2, EFFECTIVE_DIAMETER, NODE_GAP, EXPANSION_RING_MIN_RADIUS);
        for id in ["N1", "N2"] {
            let d = built.positions[id].distance(anchor);
            assert!((d - ring_radius).abs() < 1e-6);
        }
    }

    #[test]
    fn test_repeated_expansion_grows_outward() {
        let fixture = Fixture::new();
        let tx = transfer("R", "A", 1, SUI);
        let mut positions = Positions::new();
        positions.insert("R".to_string(), Point::ORIGIN);
        positions.insert("A".to_string(), Point::new(0.0, 320.0));

        let mut previous = 320.0;
        for bump in 1..=3 {
            let directive = ExpansionDirective {
                anchor_id: "A".to_string(),
                root_id: "R".to_string(),
                new_ids: vec![],
                bump_level: bump,
            };
            let built = fixture
                .builder()
                .build(&[&tx], "R", &positions, Some(&directive));
            let distance = built.positions["A"].distance(Point::ORIGIN);
            assert!(distance > previous);
            previous = distance;
            positions = built.positions;
        }
    }
}
