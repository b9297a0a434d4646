//! Tests for in-place tree edits and fresh-id allocation.
mod common;
use common::*;
use keiro::prelude::*;

#[test]
fn test_find_module_at_any_depth() {
    let modules = vec![
        rawscript("a"),
        forloop("l", vec![branchone("x", vec![("p0", vec![identity("c")])], vec![])]),
    ];

    assert!(find_module(&modules, "c").is_some());
    assert!(find_module(&modules, "x").is_some());
    assert!(find_module(&modules, "zz").is_none());
}

#[test]
fn test_find_module_mut_allows_in_place_edits() {
    let mut modules = vec![forloop("l", vec![rawscript("a")])];

    let module = find_module_mut(&mut modules, "a").expect("module exists");
    module.summary = Some("fetch the data".to_string());

    assert_eq!(
        find_module(&modules, "a").and_then(|m| m.summary.as_deref()),
        Some("fetch the data")
    );
}

#[test]
fn test_replace_module_returns_the_displaced_subtree() {
    let mut modules = vec![forloop("l", vec![rawscript("a"), identity("b")])];

    let replacement = forloop("m", vec![rawscript("c")]);
    let displaced = replace_module(&mut modules, "b", replacement).expect("replace succeeds");

    assert_eq!(displaced.id, "b");
    assert_eq!(displaced.value, FlowModuleValue::Identity);
    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["l", "a", "m", "c"]
    );
}

#[test]
fn test_replace_missing_module_fails() {
    let mut modules = vec![rawscript("a")];
    let err = replace_module(&mut modules, "zz", identity("n")).expect_err("must fail");
    assert!(matches!(err, EditError::ModuleNotFound(id) if id == "zz"));
    // The tree is untouched on failure.
    assert_eq!(flatten_order(&modules, TraversalOrder::Preview), vec!["a"]);
}

#[test]
fn test_insert_after_extends_the_owning_sequence() {
    let mut modules = vec![forloop("l", vec![rawscript("a")]), rawscript("z")];

    insert_after(&mut modules, "a", identity("b")).expect("insert succeeds");

    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["l", "a", "b", "z"]
    );
}

#[test]
fn test_remove_module_returns_it() {
    let mut modules = vec![forloop("l", vec![rawscript("a"), identity("b")])];

    let removed = remove_module(&mut modules, "a").expect("remove succeeds");
    assert_eq!(removed.id, "a");
    assert_eq!(
        flatten_order(&modules, TraversalOrder::Preview),
        vec!["l", "b"]
    );

    let err = remove_module(&mut modules, "a").expect_err("already removed");
    assert!(matches!(err, EditError::ModuleNotFound(_)));
}

#[test]
fn test_next_available_id_starts_at_the_reserved_offset() {
    let flow = flow_of(vec![rawscript("a"), rawscript("b")]);
    // Small manual ids never push the counter past the offset: base36(40).
    assert_eq!(next_available_id(&flow), "14");

    assert_eq!(next_available_id(&flow_of(vec![])), "14");
}

#[test]
fn test_next_available_id_clears_existing_assignments() {
    let flow = flow_of(vec![rawscript("14"), forloop("15", vec![rawscript("zz")])]);
    // "zz" is 1295, so the next free id is "100".
    assert_eq!(next_available_id(&flow), "100");
}
