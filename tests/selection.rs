//! Tests for selection resolution: module activation, parent and sibling
//! context, and the virtual branch-editing surfaces.
mod common;
use common::*;
use keiro::prelude::*;

#[test]
fn test_top_level_selection_carries_sibling_context() {
    let modules = vec![rawscript("a"), rawscript("b")];

    match resolve(&modules, "b") {
        Some(Selection::Module {
            module,
            parent,
            previous_sibling,
        }) => {
            assert_eq!(module.id, "b");
            assert!(parent.is_none());
            assert_eq!(previous_sibling, Some("a"));
        }
        other => panic!("expected a module activation, got {:?}", other),
    }
}

#[test]
fn test_first_module_has_no_previous_sibling() {
    let modules = vec![rawscript("a"), rawscript("b")];

    match resolve(&modules, "a") {
        Some(Selection::Module {
            previous_sibling, ..
        }) => assert!(previous_sibling.is_none()),
        other => panic!("expected a module activation, got {:?}", other),
    }
}

#[test]
fn test_selection_inside_nested_loop() {
    // Loop(l){a, Loop(m){b, c}}, selecting c.
    let modules = vec![forloop(
        "l",
        vec![rawscript("a"), forloop("m", vec![rawscript("b"), rawscript("c")])],
    )];

    match resolve(&modules, "c") {
        Some(Selection::Module {
            module,
            parent,
            previous_sibling,
        }) => {
            assert_eq!(module.id, "c");
            assert_eq!(parent.map(|p| p.id.as_str()), Some("m"));
            assert_eq!(previous_sibling, Some("b"));
        }
        other => panic!("expected a module activation, got {:?}", other),
    }
}

#[test]
fn test_composite_itself_can_be_selected() {
    let modules = vec![rawscript("a"), forloop("l", vec![identity("b")])];

    match resolve(&modules, "l") {
        Some(Selection::Module {
            module,
            parent,
            previous_sibling,
        }) => {
            assert_eq!(module.id, "l");
            assert!(parent.is_none());
            assert_eq!(previous_sibling, Some("a"));
        }
        other => panic!("expected a module activation, got {:?}", other),
    }
}

#[test]
fn test_exclusive_branch_surfaces() {
    let modules = vec![branchone(
        "x",
        vec![("p0", vec![identity("c")]), ("p1", vec![identity("d")])],
        vec![identity("e")],
    )];

    match resolve(&modules, "x-branch-default") {
        Some(Selection::BranchSurface { module, target }) => {
            assert_eq!(module.id, "x");
            assert_eq!(target, BranchTarget::Default);
        }
        other => panic!("expected a branch surface, got {:?}", other),
    }

    match resolve(&modules, "x-branch-1") {
        Some(Selection::BranchSurface { target, .. }) => {
            assert_eq!(target, BranchTarget::Index(1));
        }
        other => panic!("expected a branch surface, got {:?}", other),
    }

    // Out-of-range surfaces leave the selection unresolved.
    assert!(resolve(&modules, "x-branch-7").is_none());
}

#[test]
fn test_parallel_branch_surfaces_have_no_default() {
    let modules = vec![branchall("y", vec![vec![identity("f")], vec![identity("g")]])];

    match resolve(&modules, "y-branch-0") {
        Some(Selection::BranchSurface { target, .. }) => {
            assert_eq!(target, BranchTarget::Index(0));
        }
        other => panic!("expected a branch surface, got {:?}", other),
    }

    assert!(resolve(&modules, "y-branch-default").is_none());
}

#[test]
fn test_sibling_context_is_tracked_per_branch() {
    let modules = vec![branchone(
        "x",
        vec![("p0", vec![identity("c"), identity("d")])],
        vec![identity("e")],
    )];

    // "e" opens the default branch; "d"'s sibling lives in another sequence.
    match resolve(&modules, "e") {
        Some(Selection::Module {
            parent,
            previous_sibling,
            ..
        }) => {
            assert_eq!(parent.map(|p| p.id.as_str()), Some("x"));
            assert!(previous_sibling.is_none());
        }
        other => panic!("expected a module activation, got {:?}", other),
    }

    match resolve(&modules, "d") {
        Some(Selection::Module {
            previous_sibling, ..
        }) => assert_eq!(previous_sibling, Some("c")),
        other => panic!("expected a module activation, got {:?}", other),
    }
}

#[test]
fn test_unknown_selection_resolves_to_nothing() {
    let modules = vec![rawscript("a")];
    assert!(resolve(&modules, "zz").is_none());
    assert!(resolve(&[], "a").is_none());
}

#[test]
fn test_every_flattened_id_resolves_to_its_own_module() {
    let modules = vec![
        rawscript("a"),
        forloop(
            "l",
            vec![
                identity("b"),
                branchone(
                    "x",
                    vec![("p0", vec![rawscript("c")])],
                    vec![forloop("m", vec![identity("e")])],
                ),
            ],
        ),
        branchall("y", vec![vec![identity("f")], vec![identity("g")]]),
    ];

    for id in flatten_order(&modules, TraversalOrder::Preview) {
        match resolve(&modules, &id) {
            Some(selection) => assert_eq!(selection.module_id(), id),
            None => panic!("id '{}' did not resolve", id),
        }
    }
}
