//! # Keiro - Flow Document Modeling and Traversal Engine
//!
//! **Keiro** models the flow documents behind node-based workflow editors: a
//! tree of modules where each node is a leaf action, a loop, or a branch
//! set. Documents written by older editor versions arrive in legacy field
//! layouts; keiro migrates them to one canonical shape, assigns missing
//! module ids deterministically, and then offers the operations an editor
//! session needs: total traversal orders, selection resolution, and
//! in-place tree edits.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic at the edges and canonical in the middle:
//!
//! 1.  **Load Your Document**: Parse your flow JSON (any mix of legacy and
//!     canonical module shapes) or implement the `IntoFlow` trait for a
//!     custom format.
//! 2.  **Migrate**: `load_flow` (or a `Migrator`, if you want the report)
//!     rewrites legacy fields and assigns missing ids, yielding a typed
//!     `FlowValue`.
//! 3.  **Traverse**: `flatten_order` produces the preview
//!     (declaration-first) or completion (children-first) id order -- the
//!     key space run results are indexed by.
//! 4.  **Resolve**: on every selection change, `resolve` maps the selected
//!     id to the single active module or branch surface, with parent and
//!     previous-sibling context for the editor.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // 1. Load a document; legacy shapes are migrated transparently.
//!     let flow_json = std::fs::read_to_string("path/to/flow.json")?;
//!     let flow = load_flow(&flow_json)?;
//!
//!     // 2. The linear preview an editor sidebar renders.
//!     let preview = flatten_order(&flow.modules, TraversalOrder::Preview);
//!     println!("{} modules: {:?}", preview.len(), preview);
//!
//!     // 3. Resolve the user's current selection.
//!     match resolve(&flow.modules, "b") {
//!         Some(Selection::Module { module, parent, previous_sibling }) => {
//!             println!(
//!                 "editing {} (inside: {:?}, previous: {:?})",
//!                 module.id,
//!                 parent.map(|p| p.id.as_str()),
//!                 previous_sibling,
//!             );
//!         }
//!         Some(Selection::BranchSurface { module, target }) => {
//!             println!("editing a branch surface of {}: {:?}", module.id, target);
//!         }
//!         None => println!("nothing selected"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod edit;
pub mod error;
pub mod flow;
pub mod migrate;
pub mod prelude;
pub mod select;
pub mod traverse;
