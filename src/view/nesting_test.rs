use std::sync::Arc;

use super::*;
use crate::model::Resource;
use crate::test_utils::resource;

fn rows(specs: &[(&str, Option<&str>)]) -> Vec<Arc<Resource>> {
    specs
        .iter()
        .map(|(name, parent)| {
            let mut b = resource(name);
            if let Some(parent) = parent {
                b = b.parent(parent);
            }
            Arc::new(b.build())
        })
        .collect()
}

fn order(rows: &[ResourceRow]) -> Vec<&str> {
    rows.iter().map(|r| r.resource.name.as_str()).collect()
}

#[test]
fn children_follow_their_parent() {
    // Input is name-sorted; "api" would precede "web" flat.
    let input = rows(&[("api", Some("web")), ("db", None), ("web", None)]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(order(&ordered), vec!["db", "web", "api"]);
    assert!(ordered.iter().all(|r| !r.is_hidden));
}

#[test]
fn sibling_order_matches_input_sort() {
    let input = rows(&[("a-child", Some("web")), ("b-child", Some("web")), ("web", None)]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(order(&ordered), vec!["web", "a-child", "b-child"]);
}

#[test]
fn collapsing_hides_exactly_the_subtree() {
    let input = rows(&[
        ("grandchild", Some("mid")),
        ("mid", Some("root")),
        ("other", None),
        ("root", None),
    ]);

    let ordered = order_nested(input, |r| r.name == "mid");

    // Every resource keeps a position...
    assert_eq!(order(&ordered), vec!["other", "root", "mid", "grandchild"]);
    // ...but only mid's descendants are hidden.
    let hidden: Vec<&str> = ordered
        .iter()
        .filter(|r| r.is_hidden)
        .map(|r| r.resource.name.as_str())
        .collect();
    assert_eq!(hidden, vec!["grandchild"]);
}

#[test]
fn collapsed_ancestor_hides_deep_descendants() {
    let input = rows(&[("leaf", Some("mid")), ("mid", Some("root")), ("root", None)]);

    let ordered = order_nested(input, |r| r.name == "root");

    let hidden: Vec<&str> = ordered
        .iter()
        .filter(|r| r.is_hidden)
        .map(|r| r.resource.name.as_str())
        .collect();
    assert_eq!(hidden, vec!["mid", "leaf"]);
}

#[test]
fn dangling_parent_degrades_to_root() {
    let input = rows(&[("orphan", Some("missing")), ("web", None)]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(order(&ordered), vec!["orphan", "web"]);
    assert!(!ordered[0].has_children);
}

#[test]
fn parent_cycle_terminates_and_emits_every_resource() {
    let input = rows(&[("a", Some("b")), ("b", Some("a")), ("solo", None)]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(ordered.len(), 3);
    let mut names: Vec<&str> = order(&ordered);
    names.sort();
    assert_eq!(names, vec!["a", "b", "solo"]);
}

#[test]
fn self_parent_is_treated_as_root() {
    let input = rows(&[("selfish", Some("selfish"))]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(order(&ordered), vec!["selfish"]);
}

#[test]
fn depth_and_child_flags_are_computed() {
    let input = rows(&[("child", Some("root")), ("root", None)]);

    let ordered = order_nested(input, |_| false);

    assert_eq!(ordered[0].depth, 0);
    assert!(ordered[0].has_children);
    assert_eq!(ordered[1].depth, 1);
    assert!(!ordered[1].has_children);
}
