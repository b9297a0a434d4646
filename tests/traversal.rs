//! Tests for the preview and completion flattening orders.
mod common;
use common::*;
use keiro::prelude::*;
use keiro::traverse::duplicate_ids;
use std::collections::HashSet;

#[test]
fn test_loop_preview_and_completion_orders() {
    let modules = vec![forloop("l", vec![identity("a"), identity("b")])];

    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["l", "a", "b"]
    );
    assert_eq!(
        flatten_order(&modules, TraversalOrder::Completion),
        vec!["a", "b", "l"]
    );
}

#[test]
fn test_exclusive_branch_order_ignores_predicates() {
    let modules = vec![branchone(
        "x",
        vec![
            ("p0", vec![identity("c")]),
            ("p1", vec![identity("d")]),
        ],
        vec![identity("e")],
    )];

    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["x", "c", "d", "e"]
    );
    assert_eq!(
        flatten_order(&modules, TraversalOrder::Completion),
        vec!["c", "d", "e", "x"]
    );
}

#[test]
fn test_parallel_branch_order_is_declaration_order() {
    let modules = vec![branchall(
        "y",
        vec![vec![identity("f")], vec![identity("g"), identity("h")]],
    )];

    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["y", "f", "g", "h"]
    );
    assert_eq!(
        flatten_order(&modules, TraversalOrder::Completion),
        vec!["f", "g", "h", "y"]
    );
}

fn deeply_nested() -> Vec<FlowModule> {
    vec![
        rawscript("a"),
        forloop(
            "l",
            vec![
                identity("b"),
                branchone(
                    "x",
                    vec![("p0", vec![rawscript("c"), identity("d")])],
                    vec![forloop("m", vec![identity("e")])],
                ),
            ],
        ),
        branchall("y", vec![vec![identity("f")], vec![identity("g")]]),
    ]
}

#[test]
fn test_both_orders_contain_every_id_exactly_once() {
    let modules = deeply_nested();
    let preview = flatten_order(&modules, TraversalOrder::Preview);
    let completion = flatten_order(&modules, TraversalOrder::Completion);

    assert_eq!(preview.len(), module_count(&modules));
    assert_eq!(completion.len(), module_count(&modules));

    let preview_set: HashSet<_> = preview.iter().collect();
    let completion_set: HashSet<_> = completion.iter().collect();
    assert_eq!(preview_set.len(), preview.len());
    assert_eq!(preview_set, completion_set);
}

#[test]
fn test_orders_differ_only_in_composite_placement() {
    let modules = deeply_nested();
    let preview = flatten_order(&modules, TraversalOrder::Preview);
    let completion = flatten_order(&modules, TraversalOrder::Completion);

    // Leaves keep their relative order in both.
    let leaves = ["a", "b", "c", "d", "e", "f", "g"];
    let leaf_positions = |order: &[String]| -> Vec<usize> {
        leaves
            .iter()
            .map(|l| order.iter().position(|id| id == l).expect("leaf present"))
            .collect()
    };
    let preview_leaves = leaf_positions(&preview);
    let completion_leaves = leaf_positions(&completion);
    assert!(preview_leaves.windows(2).all(|w| w[0] < w[1]));
    assert!(completion_leaves.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_modules_before_is_the_preview_prefix() {
    let modules = deeply_nested();

    assert_eq!(modules_before(&modules, "a"), Vec::<String>::new());
    assert_eq!(modules_before(&modules, "d"), vec!["a", "l", "b", "x", "c"]);
    assert_eq!(modules_before(&modules, "missing"), Vec::<String>::new());
}

#[test]
fn test_duplicate_ids_detection() {
    assert!(duplicate_ids(&deeply_nested()).is_empty());

    let modules = vec![identity("a"), forloop("l", vec![identity("a")])];
    assert_eq!(duplicate_ids(&modules), vec!["a"]);
}
