use red_pather::error::CoreError;
use red_pather::geometry::rect::Rect;
use red_pather::scan::matcher::{match_element, reconcile, DEFAULT_TOLERANCE};
use red_pather::scan::scan_model::{ElementId, ScanResult, Strategy};
use red_pather::scan::source_tree::{parse_bounds, parse_source_tree, NodeId};

use crate::common::fixtures::{element, login_payload, LOGIN_LOCATOR, LOGIN_SOURCE};

mod common;

// ============================================================================
// Coordinate matcher
// ============================================================================

#[test]
fn near_candidate_matches_within_tolerance() {
    let target = Rect::new(100.0, 100.0, 50.0, 20.0);
    let candidates = vec![element(0, "id=a", Some(Rect::new(102.0, 98.0, 55.0, 22.0)))];

    assert_eq!(match_element(&target, &candidates, 15.0), Some(ElementId(0)));
}

#[test]
fn far_candidate_is_a_miss() {
    let target = Rect::new(100.0, 100.0, 50.0, 20.0);
    let candidates = vec![element(0, "id=a", Some(Rect::new(200.0, 100.0, 50.0, 20.0)))];

    assert_eq!(match_element(&target, &candidates, 15.0), None);
}

#[test]
fn tolerance_bounds_are_strict() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);

    let shifted = vec![element(0, "id=a", Some(Rect::new(15.0, 0.0, 100.0, 100.0)))];
    assert_eq!(match_element(&target, &shifted, 15.0), None, "center offset equal to tolerance");

    let wider = vec![element(0, "id=a", Some(Rect::new(-15.0, 0.0, 130.0, 100.0)))];
    assert_eq!(match_element(&target, &wider, 15.0), None, "size difference equal to 2x tolerance");

    let almost = vec![element(0, "id=a", Some(Rect::new(14.0, 14.0, 100.0, 100.0)))];
    assert_eq!(match_element(&target, &almost, 15.0), Some(ElementId(0)));
}

#[test]
fn first_hit_in_collection_order_wins() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    let candidates = vec![
        element(0, "id=far", Some(Rect::new(500.0, 500.0, 100.0, 100.0))),
        element(1, "id=near", Some(Rect::new(10.0, 0.0, 100.0, 100.0))),
        element(2, "id=exact", Some(Rect::new(0.0, 0.0, 100.0, 100.0))),
    ];

    assert_eq!(
        match_element(&target, &candidates, DEFAULT_TOLERANCE),
        Some(ElementId(1)),
        "an earlier acceptable candidate beats a later exact one"
    );
}

#[test]
fn deleted_and_unbounded_candidates_are_skipped() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut deleted = element(0, "id=a", Some(target));
    deleted.deleted = true;
    let candidates = vec![deleted, element(1, "id=b", None), element(2, "id=c", Some(target))];

    assert_eq!(match_element(&target, &candidates, 15.0), Some(ElementId(2)));
}

#[test]
fn empty_collection_never_matches() {
    assert_eq!(match_element(&Rect::new(0.0, 0.0, 1.0, 1.0), &[], 15.0), None);
}

// ============================================================================
// Source tree parsing
// ============================================================================

#[test]
fn android_source_parses_into_document_order() {
    let tree = parse_source_tree(LOGIN_SOURCE).unwrap();
    assert_eq!(tree.len(), 6);

    let root = tree.get(NodeId(0)).unwrap();
    assert_eq!(root.tag, "hierarchy");
    assert!(root.bounds.is_none(), "hierarchy carries no bounds");

    let button = tree.get(NodeId(4)).unwrap();
    assert_eq!(button.tag, "android.widget.Button");
    assert_eq!(button.depth, 3);
    assert_eq!(button.attribute("text"), Some("Log in"));
    assert_eq!(button.bounds, Some(Rect::new(100.0, 400.0, 880.0, 100.0)));
    assert_eq!(tree.ancestors(NodeId(4)), vec![NodeId(2), NodeId(1), NodeId(0)]);
    assert_eq!(tree.roots().collect::<Vec<_>>(), vec![NodeId(0)]);
}

#[test]
fn ios_discrete_bounds_are_recognized() {
    let source = r#"<AppiumAUT>
  <XCUIElementTypeApplication x="0" y="0" width="390" height="844">
    <XCUIElementTypeButton name="Sign In" x="20" y="400" width="350" height="44"/>
  </XCUIElementTypeApplication>
</AppiumAUT>"#;
    let tree = parse_source_tree(source).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.get(NodeId(2)).unwrap().bounds, Some(Rect::new(20.0, 400.0, 350.0, 44.0)));
}

#[test]
fn unrecognized_bounds_yield_none() {
    let attrs = vec![
        ("bounds".to_string(), "garbage".to_string()),
        ("x".to_string(), "10".to_string()),
    ];
    assert_eq!(parse_bounds(&attrs), None, "neither encoding is complete");
}

#[test]
fn malformed_source_is_an_error() {
    let err = parse_source_tree("<hierarchy><node bounds=\"[0,0][1,1]\">").unwrap_err();
    assert!(matches!(err, CoreError::MalformedSource { .. }), "got {:?}", err);

    let err = parse_source_tree("<a></b>").unwrap_err();
    assert!(matches!(err, CoreError::MalformedSource { .. }), "mismatched end tag: {:?}", err);
}

#[test]
fn text_without_a_single_root_element_is_malformed() {
    for source in ["this is not xml", "{\"json\": true}", "<a>text</a><b/>", "<a/>trailing"] {
        let result = parse_source_tree(source);
        assert!(
            matches!(result, Err(CoreError::MalformedSource { .. })),
            "{:?} should be rejected, got {:?}",
            source,
            result
        );
    }
}

#[test]
fn comments_and_whitespace_around_the_root_are_fine() {
    let tree = parse_source_tree("<?xml version=\"1.0\"?>\n<!-- dump -->\n<hierarchy/>\n").unwrap();
    assert_eq!(tree.len(), 1);
}

#[test]
fn blank_source_is_an_empty_tree() {
    assert!(parse_source_tree("  \n").unwrap().is_empty());
}

// ============================================================================
// Reconciliation and payload ingestion
// ============================================================================

#[test]
fn reconcile_pairs_interactive_nodes_only() {
    let scan = ScanResult::from_payload(login_payload(), |_| false);
    let tree = parse_source_tree(&scan.source_tree_text).unwrap();

    let rec = reconcile(&tree, &scan.elements, DEFAULT_TOLERANCE);
    assert_eq!(rec.matched_count(), 3);
    assert_eq!(rec.element_for(NodeId(3)), Some(ElementId(0)));
    assert_eq!(rec.element_for(NodeId(4)), Some(ElementId(1)));
    assert_eq!(rec.element_for(NodeId(5)), Some(ElementId(2)));
    assert_eq!(rec.element_for(NodeId(1)), None, "full-screen frame has no counterpart");
    assert_eq!(rec.node_for(ElementId(1)), Some(NodeId(4)));
}

#[test]
fn payload_assigns_ids_and_classifies_strategies() {
    let scan = ScanResult::from_payload(login_payload(), |_| false);

    assert_eq!(scan.elements.len(), 3);
    assert_eq!(scan.device.w, 1080.0);
    assert_eq!(scan.page_name.as_deref(), Some("Login"));

    let ids: Vec<_> = scan.elements.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![ElementId(0), ElementId(1), ElementId(2)]);
    assert_eq!(scan.elements[0].text, None, "empty text is dropped");
    assert_eq!(scan.elements[2].strategy, Strategy::Text);
}

#[test]
fn rejected_locators_are_dropped_before_ids_are_assigned() {
    let scan = ScanResult::from_payload(login_payload(), |locator| locator == LOGIN_LOCATOR);

    assert_eq!(scan.elements.len(), 2);
    assert_eq!(scan.elements[1].id, ElementId(1));
    assert_eq!(scan.elements[1].display_name, "forgotPassword");
}

#[test]
fn strategy_labels_classify_acc_id_before_id() {
    assert_eq!(Strategy::from_label("ACC_ID"), Strategy::AccId);
    assert_eq!(Strategy::from_label("ID"), Strategy::Id);
    assert_eq!(Strategy::from_label("ANCHOR_XP"), Strategy::Anchor);
    assert_eq!(Strategy::from_label("TEXT_XP"), Strategy::Text);
    assert_eq!(Strategy::from_label("ROBUST_XP"), Strategy::Other);
    assert_eq!(Strategy::from_label(""), Strategy::Other);
    assert_eq!(Strategy::from_label("HYBRID_XP"), Strategy::Other, "ID must be a whole label part");
    assert_eq!(Strategy::from_label("TEXT_ID"), Strategy::Text, "TEXT is checked before ID");
}
