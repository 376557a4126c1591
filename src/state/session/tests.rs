use super::*;
use crate::domain::{CreatedCoin, Direction};
use crate::graph::{EdgeKind, NodeRole};
use insta::assert_snapshot;

const SUI: &str = "0x2::sui::SUI";
const USDC: &str = "0xdba::usdc::USDC";

fn tx(from: &str, to: &str, amount: u128, coin: &str, ts: i64, digest: &str) -> Transfer {
    Transfer {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        coin: coin.to_string(),
        timestamp_ms: ts,
        digest: (!digest.is_empty()).then(|| digest.to_string()),
        direction: Direction::Sent,
    }
}

fn loaded(address: &str, transfers: Vec<Transfer>) -> Action {
    Action::TransfersLoaded {
        address: address.to_string(),
        mode: FetchMode::Replace,
        transfers,
    }
}

/// Requests an expansion of `anchor` and delivers its fetched batch.
fn expand(session: &mut Session, anchor: &str, transfers: Vec<Transfer>) {
    session.dispatch(Action::ExpandRequested(anchor.to_string()));
    session.dispatch(expansion_result(anchor, transfers));
}

fn expansion_result(anchor: &str, transfers: Vec<Transfer>) -> Action {
    Action::TransfersLoaded {
        address: anchor.to_string(),
        mode: FetchMode::Expand {
            anchor: anchor.to_string(),
        },
        transfers,
    }
}

/// Root `0xa` sent to `0xb` and received from `0xc`.
fn session_with_root() -> Session {
    let mut session = Session::new();
    session.dispatch(loaded(
        "0xa",
        vec![
            tx("0xa", "0xb", 2_000_000_000, SUI, 10_000, "D1"),
            tx("0xc", "0xa", 5_000_000, USDC, 20_000, "D2"),
        ],
    ));
    session
}

/// Times `id` has been expanded since the last full reload.
fn bump_level(session: &Session, id: &str) -> u32 {
    session.bump_levels.get(id).copied().unwrap_or(0)
}

fn edge_kind(session: &Session, source: &str, target: &str) -> Option<EdgeKind> {
    session
        .elements()
        .edges
        .iter()
        .find(|e| e.source == source && e.target == target)
        .map(|e| e.kind)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_empty_address_rejected_locally() {
    let mut session = Session::new();
    let commands = session.dispatch(Action::LoadRequested("   ".to_string()));
    assert!(commands.is_empty());
    assert_eq!(session.validation(), Some(EMPTY_ADDRESS_MESSAGE));
    assert!(!session.is_loading());
}

#[test]
fn test_load_requests_replace_fetch() {
    let mut session = Session::new();
    let commands = session.dispatch(Action::LoadRequested("  0xABC ".to_string()));
    assert_eq!(
        commands,
        vec![Command::FetchTransfers {
            address: "0xabc".to_string(),
            mode: FetchMode::Replace,
        }]
    );
    assert!(session.is_loading());
    assert_eq!(session.validation(), None);
}

#[test]
fn test_single_transfer_builds_one_edge() {
    let mut session = Session::new();
    session.dispatch(loaded("0xa", vec![tx("0xa", "0xb", 1_000_000_000, SUI, 1000, "")]));

    let elements = session.elements();
    assert_eq!(elements.nodes.len(), 2);
    assert_eq!(elements.edges.len(), 1);
    assert_snapshot!(elements.edges[0].label, @"1 tx: 1 sui");
}

#[test]
fn test_replace_seeds_root_state() {
    let mut session = Session::new();
    let commands = session.dispatch(loaded(
        "0xa",
        vec![
            tx("0xa", "0xb", 1, SUI, 10_000, "D1"),
            tx("0xa", "0xb", 1, SUI, 10_000, "D1"),
            tx("0xc", "0xa", 1, USDC, 20_000, "D2"),
        ],
    ));

    assert_eq!(session.root(), Some("0xa"));
    assert_eq!(session.transfers().len(), 2);
    assert_eq!(session.positions["0xa"], Point::ORIGIN);
    assert_eq!(
        session.expansion_groups["0xa"],
        vec!["0xb".to_string(), "0xc".to_string()]
    );
    assert_eq!(session.coin_options(), ["sui".to_string(), "usdc".to_string()]);
    assert_eq!(session.auto_window(), Some((9_000, 21_000)));
    assert_eq!(session.filter().start, Some(9_000));
    assert_eq!(session.filter().end, Some(21_000));
    assert!(session.take_needs_fit());
    assert!(!session.take_needs_fit());

    assert_eq!(
        commands,
        vec![Command::ResolveNames(vec![
            "0xa".to_string(),
            "0xb".to_string(),
            "0xc".to_string()
        ])]
    );
}

#[test]
fn test_failed_load_keeps_previous_graph() {
    let mut session = session_with_root();
    let before = session.elements().clone();

    session.dispatch(Action::LoadRequested("0xz".to_string()));
    session.dispatch(Action::TransfersFailed {
        address: "0xz".to_string(),
        mode: FetchMode::Replace,
        message: "rate limited".to_string(),
    });

    assert_eq!(session.error(), Some("rate limited"));
    assert!(!session.is_loading());
    assert_eq!(session.root(), Some("0xa"));
    assert_eq!(session.elements(), &before);

    session.dispatch(Action::DismissError);
    assert_eq!(session.error(), None);
}

// ============================================================================
// Expansion
// ============================================================================

#[test]
fn test_expand_requires_root_and_single_flight() {
    let mut session = Session::new();
    assert!(session.dispatch(Action::ExpandRequested("0xb".into())).is_empty());

    let mut session = session_with_root();
    let first = session.dispatch(Action::ExpandRequested("0xb".into()));
    assert_eq!(first.len(), 1);
    assert!(session.is_expanding());
    assert!(session.dispatch(Action::ExpandRequested("0xb".into())).is_empty());
}

#[test]
fn test_expand_pushes_anchor_outward_and_keeps_others() {
    let mut session = session_with_root();
    let c_before = session.positions["0xc"];
    let root = session.positions["0xa"];
    let mut distance = session.positions["0xb"].distance(root);
    assert_eq!(edge_kind(&session, "0xa", "0xb"), Some(EdgeKind::Flow));

    expand(
        &mut session,
        "0xb",
        vec![
            tx("0xb", "0xd", 1, SUI, 11_000, "D3"),
            tx("0xe", "0xb", 1, SUI, 12_000, "D4"),
            tx("0xa", "0xb", 2_000_000_000, SUI, 10_000, "D1"),
        ],
    );

    assert!(!session.is_expanding());
    assert_eq!(bump_level(&session, "0xb"), 1);
    assert_eq!(session.transfers().len(), 4);
    assert_eq!(
        session.expansion_groups["0xb"],
        vec!["0xd".to_string(), "0xe".to_string()]
    );
    assert_eq!(session.positions["0xc"], c_before);
    let after = session.positions["0xb"].distance(root);
    assert!(after > distance);
    distance = after;
    assert_eq!(edge_kind(&session, "0xa", "0xb"), Some(EdgeKind::Receive));
    assert_eq!(edge_kind(&session, "0xc", "0xa"), Some(EdgeKind::Receive));
    assert_eq!(edge_kind(&session, "0xb", "0xd"), Some(EdgeKind::Flow));

    expand(&mut session, "0xb", vec![tx("0xb", "0xf", 1, SUI, 13_000, "D5")]);
    assert_eq!(bump_level(&session, "0xb"), 2);
    assert!(session.positions["0xb"].distance(root) > distance);
    assert_eq!(session.expansion_groups["0xb"].len(), 3);
}

#[test]
fn test_replace_resets_bumps_and_groups() {
    let mut session = session_with_root();
    expand(&mut session, "0xb", vec![tx("0xb", "0xd", 1, SUI, 11_000, "D3")]);
    assert_eq!(bump_level(&session, "0xb"), 1);

    session.dispatch(loaded("0xb", vec![tx("0xb", "0xd", 1, SUI, 11_000, "D3")]));
    assert_eq!(bump_level(&session, "0xb"), 0);
    assert_eq!(session.root(), Some("0xb"));
    assert_eq!(session.expansion_groups.len(), 1);
    assert_eq!(session.positions["0xb"], Point::ORIGIN);
}

#[test]
fn test_expansion_landing_after_reload_is_dropped() {
    let mut session = session_with_root();
    session.dispatch(Action::ExpandRequested("0xb".into()));
    session.dispatch(loaded("0xz", vec![tx("0xy", "0xz", 1, SUI, 30_000, "D9")]));

    session.dispatch(expansion_result(
        "0xb",
        vec![tx("0xb", "0xq", 1, SUI, 31_000, "D10")],
    ));

    assert_eq!(session.root(), Some("0xz"));
    assert_eq!(session.transfers().len(), 1);
    assert_eq!(bump_level(&session, "0xb"), 0);
    assert!(!session.expansion_groups.contains_key("0xb"));
    assert!(session.elements().node("0xq").is_none());
    assert!(session.elements().node("0xb").is_none());

    session.dispatch(Action::TransfersFailed {
        address: "0xb".into(),
        mode: FetchMode::Expand {
            anchor: "0xb".into(),
        },
        message: "timeout".into(),
    });
    assert_eq!(session.error(), None);
}

#[test]
fn test_expansion_keeps_custom_time_window() {
    let mut session = session_with_root();
    session.dispatch(Action::SetTimeWindow {
        start: Some(15_000),
        end: None,
    });
    expand(&mut session, "0xb", vec![tx("0xb", "0xd", 1, SUI, 50_000, "D3")]);

    assert_eq!(session.filter().start, Some(15_000));
    assert_eq!(session.filter().end, None);
    assert_eq!(session.auto_window(), Some((9_000, 51_000)));
}

#[test]
fn test_expansion_follows_untouched_time_window() {
    let mut session = session_with_root();
    expand(&mut session, "0xb", vec![tx("0xb", "0xd", 1, SUI, 50_000, "D3")]);
    assert_eq!(session.filter().start, Some(9_000));
    assert_eq!(session.filter().end, Some(51_000));
    assert_eq!(session.filtered_count(), 3);
}

// ============================================================================
// Filters and Rules
// ============================================================================

#[test]
fn test_coin_filter_hides_edges() {
    let mut session = session_with_root();
    session.dispatch(Action::SetCoinFilter(Some("usdc".into())));
    assert_eq!(session.filtered_count(), 1);
    assert_eq!(session.elements().edges.len(), 1);
    assert_eq!(session.elements().edges[0].symbol, "usdc");

    session.dispatch(Action::SetCoinFilter(None));
    assert_eq!(session.elements().edges.len(), 2);
}

#[test]
fn test_draft_rules_apply_only_on_commit() {
    let mut session = session_with_root();
    session.dispatch(Action::AddDraftRule);
    session.dispatch(Action::SetDraftCoin {
        index: 0,
        coin: "USDC".into(),
    });
    session.dispatch(Action::SetDraftMin {
        index: 0,
        min_amount: "10".into(),
    });
    assert!(session.rules().is_empty());
    assert_eq!(session.filtered_count(), 2);

    session.dispatch(Action::ApplyRules);
    assert_eq!(session.rules(), [CoinRule::new("usdc", 10.0)]);
    assert_eq!(session.filtered_count(), 1);

    session.dispatch(Action::RemoveDraftRule(0));
    assert!(session.drafts().is_empty());
    assert!(session.rules().is_empty());
    assert_eq!(session.filtered_count(), 2);
}

#[test]
fn test_remove_out_of_range_draft_is_noop() {
    let mut session = session_with_root();
    assert_eq!(session.reduce(Action::RemoveDraftRule(3)), Transition::default());
}

// ============================================================================
// Names, Creators and Selection
// ============================================================================

#[test]
fn test_name_resolution_relabels_node() {
    let mut session = session_with_root();
    let resolved = NameResolved {
        address: "0xb".into(),
        name: Some("bobthebuilder.sui".into()),
    };

    let transition = session.reduce(Action::NameResolved(resolved.clone()));
    assert_eq!(
        transition.recompute,
        vec![Recompute::RebuildGraph, Recompute::RefreshDetail]
    );
    session.apply(&transition.recompute);

    let node = session.elements().node("0xb").unwrap();
    assert_eq!(node.role, NodeRole::Named);
    assert_snapshot!(node.label, @"bobthebui..");

    assert_eq!(
        session.reduce(Action::NameResolved(resolved)),
        Transition::default()
    );
}

#[test]
fn test_scan_lifecycle() {
    let mut session = session_with_root();
    let commands = session.dispatch(Action::ScanRequested);
    let Some(Command::ScanCreators(addresses)) = commands.first() else {
        panic!("expected scan command, got {commands:?}");
    };
    assert_eq!(addresses.len(), 3);
    assert_eq!(
        session.scan_status(),
        ScanStatus::Scanning { done: 0, total: 3 }
    );
    assert!(session.dispatch(Action::ScanRequested).is_empty());

    let coin = CreatedCoin::new("0xc::meme::MEME", None);
    session.dispatch(Action::ScanProgress {
        address: "0xc".into(),
        coins: vec![coin.clone()],
        done: 1,
        total: 3,
    });
    assert_eq!(session.elements().node("0xc").unwrap().role, NodeRole::Creator);
    assert_eq!(session.scan_results().len(), 1);

    let mut registry = CreatorRegistry::new();
    registry.record("0xc", vec![coin]);
    session.dispatch(Action::ScanFinished(ScanReport {
        registry,
        scanned: 3,
    }));
    assert_eq!(session.scan_status(), ScanStatus::Done { creators: 1 });

    session.dispatch(Action::ClearScanResults);
    assert!(session.scan_results().is_empty());
    assert_eq!(session.scan_status(), ScanStatus::Idle);
    assert!(session.creators().is_creator("0xc"));
}

#[test]
fn test_scan_needs_nodes() {
    let mut session = Session::new();
    assert!(session.dispatch(Action::ScanRequested).is_empty());
    assert_eq!(session.scan_status(), ScanStatus::Idle);
}

#[test]
fn test_detail_rows_newest_first() {
    let mut session = session_with_root();
    session.dispatch(Action::SelectNode(Some("0xa".into())));

    let rows = session.detail();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].timestamp_ms, 20_000);
    assert_eq!(rows[0].direction_label(), "IN");
    assert_eq!(rows[0].counterparty, "0xc");
    assert_eq!(rows[0].amount, "5 usdc");
    assert_eq!(rows[1].direction_label(), "OUT");
    assert_eq!(rows[1].amount, "2 sui");
    assert_eq!(rows[1].date(), "1970-01-01 00:00");

    session.dispatch(Action::SelectNode(None));
    assert!(session.detail().is_empty());
}

#[test]
fn test_drag_moves_expansion_group() {
    let mut session = session_with_root();
    let b = session.positions["0xb"];
    let c = session.positions["0xc"];

    session.dispatch(Action::GrabNode {
        id: "0xa".into(),
        at: Point::ORIGIN,
    });
    assert!(session.is_dragging());
    session.dispatch(Action::DragTo(Point::new(10.0, -5.0)));
    session.dispatch(Action::ReleaseNode);

    assert_eq!(session.positions["0xa"], Point::new(10.0, -5.0));
    assert_eq!(session.positions["0xb"], b.offset(10.0, -5.0));
    assert_eq!(session.positions["0xc"], c.offset(10.0, -5.0));
    assert_eq!(
        session.elements().node("0xb").unwrap().position,
        b.offset(10.0, -5.0)
    );
    assert!(!session.is_dragging());
}
