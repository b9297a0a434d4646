//! Deterministic flattening of the module tree into total id orders.
//!
//! Both orders are static properties of the document structure: branch
//! predicates never influence them. They enumerate every module a run
//! *could* touch, which is exactly the key space result and schema
//! bookkeeping is indexed by.

use crate::flow::{FlowModule, FlowModuleValue};
use itertools::Itertools;

/// Where a composite emits its own id relative to its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Declaration order: composite before its descendants. What a linear
    /// editor preview shows.
    Preview,
    /// Completion order: composite after its descendants. The order results
    /// become available in.
    Completion,
}

/// Flattens the tree into the total visiting order of all module ids.
/// Every id in the tree appears exactly once; the output length equals
/// [`module_count`].
pub fn flatten_order(modules: &[FlowModule], order: TraversalOrder) -> Vec<String> {
    let mut out = Vec::new();
    push_sequence(modules, order, &mut out);
    out
}

fn push_sequence(modules: &[FlowModule], order: TraversalOrder, out: &mut Vec<String>) {
    for module in modules {
        push_module(module, order, out);
    }
}

fn push_module(module: &FlowModule, order: TraversalOrder, out: &mut Vec<String>) {
    match &module.value {
        FlowModuleValue::Script { .. }
        | FlowModuleValue::RawScript { .. }
        | FlowModuleValue::Flow { .. }
        | FlowModuleValue::Identity => out.push(module.id.clone()),
        FlowModuleValue::ForloopFlow { modules, .. } => {
            if order == TraversalOrder::Preview {
                out.push(module.id.clone());
            }
            push_sequence(modules, order, out);
            if order == TraversalOrder::Completion {
                out.push(module.id.clone());
            }
        }
        FlowModuleValue::BranchOne { branches, default } => {
            if order == TraversalOrder::Preview {
                out.push(module.id.clone());
            }
            for branch in branches {
                push_sequence(&branch.modules, order, out);
            }
            push_sequence(default, order, out);
            if order == TraversalOrder::Completion {
                out.push(module.id.clone());
            }
        }
        FlowModuleValue::BranchAll { branches, .. } => {
            if order == TraversalOrder::Preview {
                out.push(module.id.clone());
            }
            for branch in branches {
                push_sequence(&branch.modules, order, out);
            }
            if order == TraversalOrder::Completion {
                out.push(module.id.clone());
            }
        }
    }
}

/// Total number of modules in the tree, composites included.
pub fn module_count(modules: &[FlowModule]) -> usize {
    modules
        .iter()
        .map(|m| match &m.value {
            FlowModuleValue::ForloopFlow { modules, .. } => 1 + module_count(modules),
            FlowModuleValue::BranchOne { branches, default } => {
                1 + branches
                    .iter()
                    .map(|b| module_count(&b.modules))
                    .sum::<usize>()
                    + module_count(default)
            }
            FlowModuleValue::BranchAll { branches, .. } => {
                1 + branches
                    .iter()
                    .map(|b| module_count(&b.modules))
                    .sum::<usize>()
            }
            _ => 1,
        })
        .sum()
}

/// Ids preceding `id` in preview order: the modules whose results are
/// already available when `id` runs. Empty when `id` is first or absent.
pub fn modules_before(modules: &[FlowModule], id: &str) -> Vec<String> {
    let mut order = flatten_order(modules, TraversalOrder::Preview);
    match order.iter().position(|candidate| candidate == id) {
        Some(i) => {
            order.truncate(i);
            order
        }
        None => Vec::new(),
    }
}

/// Ids appearing more than once in the tree. The canonical shape guarantees
/// none; callers that accept documents from elsewhere can check cheaply.
pub fn duplicate_ids(modules: &[FlowModule]) -> Vec<String> {
    flatten_order(modules, TraversalOrder::Preview)
        .into_iter()
        .duplicates()
        .collect()
}
