//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from
//! the keiro crate. Import this module to get access to the core
//! functionality without having to import each item individually.
//!
//! # Example
//!
//! ```rust,no_run
//! // Use the prelude to get easy access to all the core types.
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow_json = std::fs::read_to_string("path/to/flow.json")?;
//! let flow = load_flow(&flow_json)?;
//!
//! let order = flatten_order(&flow.modules, TraversalOrder::Completion);
//! println!("results arrive in the order {:?}", order);
//! # Ok(())
//! # }
//! ```

// Document model
pub use crate::flow::{
    Branch, BranchAllBranch, FlowModule, FlowModuleValue, FlowValue, InputTransform, ScriptLang,
    StopAfterIf,
};

// Migration
pub use crate::migrate::{MigrationReport, Migrator, load_flow, migrate};

// Traversal and selection
pub use crate::select::{BranchTarget, Selection, resolve};
pub use crate::traverse::{TraversalOrder, flatten_order, module_count, modules_before};

// Editing
pub use crate::edit::{
    find_module, find_module_mut, insert_after, next_available_id, remove_module, replace_module,
};

// Conversion and persistence
pub use crate::flow::{FlowArtifact, IntoFlow};

// Error types
pub use crate::error::{EditError, FlowLoadError, StructuralError};

// Result type alias for convenience; the error type can still be overridden
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
