//! Pure resolution of an editor selection against the module tree.
//!
//! Given the id the user currently has selected, [`resolve`] decides which
//! single node (or branch-editing surface) is active. It returns a
//! description of the activation; mapping that description to presentation
//! is entirely the view layer's concern, and mutating the tree in response
//! to user actions is a separate editing operation.

use crate::flow::{FlowModule, FlowModuleValue};

/// Which editing surface of a branch module is selected, as opposed to a
/// module nested inside one of its branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    /// The default sequence of an exclusive branch set.
    Default,
    /// The branch at this declaration index.
    Index(usize),
}

/// The single activation a selection resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    /// A module is selected for editing.
    Module {
        module: &'a FlowModule,
        /// The enclosing composite, when the module is nested.
        parent: Option<&'a FlowModule>,
        /// Id of the immediately preceding module in the same sequence,
        /// whose output the editor can offer as input context.
        previous_sibling: Option<&'a str>,
    },
    /// A branch's predicate-editing surface is selected, via the virtual
    /// ids `{id}-branch-{index}` and `{id}-branch-default`.
    BranchSurface {
        module: &'a FlowModule,
        target: BranchTarget,
    },
}

impl<'a> Selection<'a> {
    /// Id of the selected module, or of the module owning the selected
    /// branch surface.
    pub fn module_id(&self) -> &'a str {
        let module: &'a FlowModule = match self {
            Selection::Module { module, .. } => *module,
            Selection::BranchSurface { module, .. } => *module,
        };
        &module.id
    }
}

/// Resolves `selected_id` against the tree. At most one node or branch
/// surface activates per call; an id matching nothing resolves to `None`,
/// which is a valid "nothing selected" state, not an error.
pub fn resolve<'a>(modules: &'a [FlowModule], selected_id: &str) -> Option<Selection<'a>> {
    resolve_sequence(modules, selected_id, None)
}

fn resolve_sequence<'a>(
    sequence: &'a [FlowModule],
    selected_id: &str,
    parent: Option<&'a FlowModule>,
) -> Option<Selection<'a>> {
    let mut previous: Option<&'a str> = None;
    for module in sequence {
        if module.id == selected_id {
            return Some(Selection::Module {
                module,
                parent,
                previous_sibling: previous,
            });
        }
        if let Some(hit) = resolve_children(module, selected_id) {
            return Some(hit);
        }
        previous = Some(&module.id);
    }
    None
}

fn resolve_children<'a>(module: &'a FlowModule, selected_id: &str) -> Option<Selection<'a>> {
    match &module.value {
        FlowModuleValue::ForloopFlow { modules, .. } => {
            resolve_sequence(modules, selected_id, Some(module))
        }
        FlowModuleValue::BranchOne { branches, default } => {
            if let Some(target) =
                branch_surface(&module.id, selected_id, branches.len(), true)
            {
                return Some(Selection::BranchSurface { module, target });
            }
            branches
                .iter()
                .find_map(|b| resolve_sequence(&b.modules, selected_id, Some(module)))
                .or_else(|| resolve_sequence(default, selected_id, Some(module)))
        }
        FlowModuleValue::BranchAll { branches, .. } => {
            if let Some(target) =
                branch_surface(&module.id, selected_id, branches.len(), false)
            {
                return Some(Selection::BranchSurface { module, target });
            }
            branches
                .iter()
                .find_map(|b| resolve_sequence(&b.modules, selected_id, Some(module)))
        }
        _ => None,
    }
}

/// Parses the virtual branch-surface ids owned by `module_id`. Out-of-range
/// indices match nothing, leaving the selection unresolved.
fn branch_surface(
    module_id: &str,
    selected_id: &str,
    branch_count: usize,
    has_default: bool,
) -> Option<BranchTarget> {
    let suffix = selected_id
        .strip_prefix(module_id)?
        .strip_prefix("-branch-")?;
    if has_default && suffix == "default" {
        return Some(BranchTarget::Default);
    }
    suffix
        .parse::<usize>()
        .ok()
        .filter(|i| *i < branch_count)
        .map(BranchTarget::Index)
}
