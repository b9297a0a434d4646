//! In-place tree edits the editor performs between load and save: locate a
//! module by id, swap a subtree, insert a step, remove one, and allocate
//! fresh ids consistent with migration's counter rule.
//!
//! Id uniqueness of caller-supplied subtrees is the caller's responsibility;
//! [`crate::traverse::duplicate_ids`] offers a cheap check.

use crate::error::EditError;
use crate::flow::{FlowModule, FlowModuleValue, FlowValue};
use crate::migrate::ids;
use crate::traverse::{TraversalOrder, flatten_order};

/// Depth-first lookup of a module by id.
pub fn find_module<'a>(modules: &'a [FlowModule], id: &str) -> Option<&'a FlowModule> {
    for module in modules {
        if module.id == id {
            return Some(module);
        }
        for sequence in child_sequences(module) {
            if let Some(found) = find_module(sequence, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable depth-first lookup of a module by id.
pub fn find_module_mut<'a>(modules: &'a mut [FlowModule], id: &str) -> Option<&'a mut FlowModule> {
    for module in modules.iter_mut() {
        if module.id == id {
            return Some(module);
        }
        for sequence in child_sequences_mut(module) {
            if let Some(found) = find_module_mut(sequence, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Replaces the module with the given id by a new subtree, returning the
/// displaced module.
pub fn replace_module(
    modules: &mut Vec<FlowModule>,
    id: &str,
    new: FlowModule,
) -> Result<FlowModule, EditError> {
    try_replace(modules, id, new).map_err(|_| EditError::ModuleNotFound(id.to_string()))
}

/// Inserts a module immediately after the one with the given id, in the
/// same sequence.
pub fn insert_after(
    modules: &mut Vec<FlowModule>,
    id: &str,
    new: FlowModule,
) -> Result<(), EditError> {
    try_insert_after(modules, id, new).map_err(|_| EditError::ModuleNotFound(id.to_string()))
}

/// Removes the module with the given id from its sequence, returning it.
pub fn remove_module(modules: &mut Vec<FlowModule>, id: &str) -> Result<FlowModule, EditError> {
    if let Some(i) = modules.iter().position(|m| m.id == id) {
        return Ok(modules.remove(i));
    }
    for module in modules.iter_mut() {
        for sequence in child_sequences_mut(module) {
            if let Ok(removed) = remove_module(sequence, id) {
                return Ok(removed);
            }
        }
    }
    Err(EditError::ModuleNotFound(id.to_string()))
}

/// The next id migration's counter would hand out for this document:
/// base36, at least the reserved offset, above every existing id.
pub fn next_available_id(flow: &FlowValue) -> String {
    let mut next = ids::ID_OFFSET;
    let mut bump = |id: &str| {
        if let Some(n) = ids::decode_base36(id) {
            next = next.max(n.saturating_add(1));
        }
    };
    for id in flatten_order(&flow.modules, TraversalOrder::Preview) {
        bump(&id);
    }
    if let Some(failure) = &flow.failure_module {
        for id in flatten_order(std::slice::from_ref(failure.as_ref()), TraversalOrder::Preview) {
            bump(&id);
        }
    }
    ids::encode_base36(next)
}

// Ownership threads the new module through the recursion and hands it back
// on the Err path, so a failed deep search doesn't consume it.

fn try_replace(
    sequence: &mut Vec<FlowModule>,
    id: &str,
    new: FlowModule,
) -> Result<FlowModule, FlowModule> {
    if let Some(i) = sequence.iter().position(|m| m.id == id) {
        return Ok(std::mem::replace(&mut sequence[i], new));
    }
    let mut new = new;
    for module in sequence.iter_mut() {
        for child in child_sequences_mut(module) {
            match try_replace(child, id, new) {
                Ok(old) => return Ok(old),
                Err(returned) => new = returned,
            }
        }
    }
    Err(new)
}

fn try_insert_after(
    sequence: &mut Vec<FlowModule>,
    id: &str,
    new: FlowModule,
) -> Result<(), FlowModule> {
    if let Some(i) = sequence.iter().position(|m| m.id == id) {
        sequence.insert(i + 1, new);
        return Ok(());
    }
    let mut new = new;
    for module in sequence.iter_mut() {
        for child in child_sequences_mut(module) {
            match try_insert_after(child, id, new) {
                Ok(()) => return Ok(()),
                Err(returned) => new = returned,
            }
        }
    }
    Err(new)
}

fn child_sequences(module: &FlowModule) -> Vec<&Vec<FlowModule>> {
    match &module.value {
        FlowModuleValue::ForloopFlow { modules, .. } => vec![modules],
        FlowModuleValue::BranchOne { branches, default } => branches
            .iter()
            .map(|b| &b.modules)
            .chain(std::iter::once(default))
            .collect(),
        FlowModuleValue::BranchAll { branches, .. } => {
            branches.iter().map(|b| &b.modules).collect()
        }
        _ => Vec::new(),
    }
}

fn child_sequences_mut(module: &mut FlowModule) -> Vec<&mut Vec<FlowModule>> {
    match &mut module.value {
        FlowModuleValue::ForloopFlow { modules, .. } => vec![modules],
        FlowModuleValue::BranchOne { branches, default } => branches
            .iter_mut()
            .map(|b| &mut b.modules)
            .chain(std::iter::once(default))
            .collect(),
        FlowModuleValue::BranchAll { branches, .. } => {
            branches.iter_mut().map(|b| &mut b.modules).collect()
        }
        _ => Vec::new(),
    }
}
