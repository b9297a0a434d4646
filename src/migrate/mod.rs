//! Migration of raw flow documents into the canonical shape.
//!
//! Documents arrive as plain JSON, possibly carrying legacy field layouts
//! from older editor versions (heterogeneously, within one document).
//! [`Migrator`] rewrites them in a single declaration-order walk:
//!
//! - modules without an `id` get one assigned from a base36 counter;
//! - the legacy singular `input_transform` is renamed `input_transforms`;
//! - transforms staged on the module wrapper are folded into the action;
//! - the legacy `stop_after_if_expr` / `skip_if_stopped` pair becomes a
//!   `stop_after_if` object;
//! - loop children nested under a legacy `value.value` wrapper are hoisted.
//!
//! Every rewrite is gated on a presence check, so migration is idempotent:
//! running it on an already-canonical document changes nothing.

pub mod ids;

use crate::error::{FlowLoadError, StructuralError};
use crate::flow::FlowValue;
use ids::{decode_base36, encode_base36};
use serde_json::map::Map;
use serde_json::{Value, json};

pub use ids::ID_OFFSET;

/// What a migration run did to the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Ids handed out, in assignment (= declaration) order.
    pub assigned_ids: Vec<String>,
    pub renamed_transforms: usize,
    pub folded_transforms: usize,
    pub rebuilt_stop_conditions: usize,
    pub unwrapped_loops: usize,
}

impl MigrationReport {
    /// True when the document was already fully canonical.
    pub fn is_noop(&self) -> bool {
        self.assigned_ids.is_empty()
            && self.renamed_transforms == 0
            && self.folded_transforms == 0
            && self.rebuilt_stop_conditions == 0
            && self.unwrapped_loops == 0
    }
}

/// Single-use migration pass over one document.
pub struct Migrator {
    counter: u64,
    report: MigrationReport,
}

impl Migrator {
    pub fn new() -> Self {
        Self {
            counter: ids::ID_OFFSET,
            report: MigrationReport::default(),
        }
    }

    /// Migrates `doc` to the canonical shape, consuming the migrator.
    ///
    /// The counter for fresh ids starts at [`ID_OFFSET`] and above any
    /// base36-decodable id already present anywhere in the document, so
    /// assignments never collide with existing ids.
    pub fn migrate(mut self, mut doc: Value) -> Result<(Value, MigrationReport), StructuralError> {
        self.counter = seed_counter(&doc);
        {
            let root = doc
                .as_object_mut()
                .ok_or(StructuralError::RootNotAnObject)?;
            let modules = root
                .get_mut("modules")
                .ok_or_else(|| StructuralError::ExpectedSequence {
                    path: "modules".to_string(),
                })?;
            self.migrate_sequence(modules, "modules")?;
            if let Some(failure) = root.get_mut("failure_module") {
                if !failure.is_null() {
                    self.migrate_module(failure, "failure_module")?;
                }
            }
        }
        Ok((doc, self.report))
    }

    fn migrate_sequence(&mut self, seq: &mut Value, path: &str) -> Result<(), StructuralError> {
        let arr = seq
            .as_array_mut()
            .ok_or_else(|| StructuralError::ExpectedSequence {
                path: path.to_string(),
            })?;
        for (i, module) in arr.iter_mut().enumerate() {
            self.migrate_module(module, &format!("{path}[{i}]"))?;
        }
        Ok(())
    }

    fn migrate_module(&mut self, module: &mut Value, path: &str) -> Result<(), StructuralError> {
        let obj = module
            .as_object_mut()
            .ok_or_else(|| StructuralError::ModuleNotAnObject {
                path: path.to_string(),
            })?;

        // Ids are assigned lazily, parent before children, so the counter
        // runs in document declaration order.
        let has_id = matches!(obj.get("id"), Some(Value::String(s)) if !s.is_empty());
        if !has_id {
            let id = encode_base36(self.counter);
            self.counter += 1;
            self.report.assigned_ids.push(id.clone());
            obj.insert("id".to_string(), Value::String(id));
        }
        let module_id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        // Legacy singular transform name at the module level.
        if let Some(transforms) = obj.remove("input_transform") {
            if !obj.contains_key("input_transforms") {
                obj.insert("input_transforms".to_string(), transforms);
            }
            self.report.renamed_transforms += 1;
        }

        // Legacy split stop condition.
        if let Some(expr) = obj.remove("stop_after_if_expr") {
            let skip_if_stopped = obj
                .remove("skip_if_stopped")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !obj.contains_key("stop_after_if") {
                obj.insert(
                    "stop_after_if".to_string(),
                    json!({ "expr": expr, "skip_if_stopped": skip_if_stopped }),
                );
            }
            self.report.rebuilt_stop_conditions += 1;
        } else {
            // A skip flag without an expression has nothing to fold into.
            obj.remove("skip_if_stopped");
        }

        let mut value =
            obj.remove("value")
                .ok_or_else(|| StructuralError::MissingValue {
                    module_id: module_id.clone(),
                })?;
        if !value.is_object() {
            return Err(StructuralError::MissingValue { module_id });
        }
        let kind = match value.get("type") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(StructuralError::MissingType { module_id }),
        };

        match kind.as_str() {
            "script" | "rawscript" | "flow" => {
                self.fold_staged_transforms(obj, &mut value);
            }
            "forloopflow" => {
                self.unwrap_legacy_loop(&mut value, &module_id)?;
                self.migrate_children(&mut value, "modules", &format!("{path}.modules"))?;
            }
            "branchone" => {
                if value.get("value").is_some() {
                    return Err(StructuralError::LegacyBranchNesting { module_id });
                }
                self.migrate_branches(&mut value, path)?;
                self.migrate_children(&mut value, "default", &format!("{path}.default"))?;
            }
            "branchall" => {
                if value.get("value").is_some() {
                    return Err(StructuralError::LegacyBranchNesting { module_id });
                }
                self.migrate_branches(&mut value, path)?;
            }
            "identity" => {}
            other => {
                return Err(StructuralError::UnknownModuleType {
                    module_id,
                    type_name: other.to_string(),
                });
            }
        }

        obj.insert("value".to_string(), value);
        Ok(())
    }

    /// Moves transforms staged on the module wrapper into the action value,
    /// where the canonical shape keeps them.
    fn fold_staged_transforms(&mut self, obj: &mut Map<String, Value>, value: &mut Value) {
        if let Some(staged) = obj.remove("input_transforms") {
            if let Some(value_obj) = value.as_object_mut() {
                let own_is_empty = match value_obj.get("input_transforms") {
                    None => true,
                    Some(Value::Object(m)) => m.is_empty(),
                    Some(_) => false,
                };
                if let Value::Object(staged_map) = staged {
                    if own_is_empty && !staged_map.is_empty() {
                        value_obj
                            .insert("input_transforms".to_string(), Value::Object(staged_map));
                        self.report.folded_transforms += 1;
                    }
                }
            }
        }
        // The legacy singular name may also appear inside the value.
        if let Some(value_obj) = value.as_object_mut() {
            if let Some(transforms) = value_obj.remove("input_transform") {
                if !value_obj.contains_key("input_transforms") {
                    value_obj.insert("input_transforms".to_string(), transforms);
                }
                self.report.renamed_transforms += 1;
            }
        }
    }

    /// Hoists loop children out of the legacy `value.value` wrapper. Only
    /// loops ever shipped in that doubly-nested shape; the equivalent shape
    /// on a branch module is rejected upstream.
    fn unwrap_legacy_loop(
        &mut self,
        value: &mut Value,
        module_id: &str,
    ) -> Result<(), StructuralError> {
        let Some(value_obj) = value.as_object_mut() else {
            return Ok(());
        };
        if let Some(wrapper) = value_obj.remove("value") {
            let wrapper = match wrapper {
                Value::Object(m) => m,
                _ => {
                    return Err(StructuralError::LoopWrapperNotAnObject {
                        module_id: module_id.to_string(),
                    });
                }
            };
            for (key, entry) in wrapper {
                if key == "modules" || !value_obj.contains_key(&key) {
                    value_obj.insert(key, entry);
                }
            }
            self.report.unwrapped_loops += 1;
        }
        if !value_obj.contains_key("modules") {
            value_obj.insert("modules".to_string(), Value::Array(Vec::new()));
        }
        Ok(())
    }

    fn migrate_children(
        &mut self,
        value: &mut Value,
        key: &str,
        path: &str,
    ) -> Result<(), StructuralError> {
        let Some(value_obj) = value.as_object_mut() else {
            return Ok(());
        };
        if !value_obj.contains_key(key) {
            value_obj.insert(key.to_string(), Value::Array(Vec::new()));
        }
        if let Some(children) = value_obj.get_mut(key) {
            self.migrate_sequence(children, path)?;
        }
        Ok(())
    }

    fn migrate_branches(&mut self, value: &mut Value, path: &str) -> Result<(), StructuralError> {
        let Some(value_obj) = value.as_object_mut() else {
            return Ok(());
        };
        let Some(branches) = value_obj.get_mut("branches") else {
            return Ok(());
        };
        let arr = branches
            .as_array_mut()
            .ok_or_else(|| StructuralError::ExpectedSequence {
                path: format!("{path}.branches"),
            })?;
        for (i, branch) in arr.iter_mut().enumerate() {
            let branch_path = format!("{path}.branches[{i}]");
            let bobj = branch
                .as_object_mut()
                .ok_or_else(|| StructuralError::BranchNotAnObject {
                    path: branch_path.clone(),
                })?;
            if !bobj.contains_key("modules") {
                bobj.insert("modules".to_string(), Value::Array(Vec::new()));
            }
            if let Some(children) = bobj.get_mut("modules") {
                self.migrate_sequence(children, &format!("{branch_path}.modules"))?;
            }
        }
        Ok(())
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Migrates a raw document to the canonical shape, discarding the report.
pub fn migrate(doc: Value) -> Result<Value, StructuralError> {
    Migrator::new().migrate(doc).map(|(doc, _)| doc)
}

/// Parses, migrates, and deserializes a JSON document into the typed model.
pub fn load_flow(flow_json: &str) -> Result<FlowValue, FlowLoadError> {
    let doc: Value =
        serde_json::from_str(flow_json).map_err(|e| FlowLoadError::JsonParse(e.to_string()))?;
    let (doc, _) = Migrator::new().migrate(doc)?;
    serde_json::from_value(doc).map_err(|e| FlowLoadError::Deserialize(e.to_string()))
}

/// The first counter value no existing id occupies, never below the offset.
fn seed_counter(doc: &Value) -> u64 {
    let mut next = ids::ID_OFFSET;
    let Some(root) = doc.as_object() else {
        return next;
    };
    if let Some(modules) = root.get("modules").and_then(Value::as_array) {
        for module in modules {
            scan_module_ids(module, &mut next);
        }
    }
    if let Some(failure) = root.get("failure_module") {
        scan_module_ids(failure, &mut next);
    }
    next
}

fn scan_module_ids(module: &Value, next: &mut u64) {
    let Some(obj) = module.as_object() else {
        return;
    };
    if let Some(n) = obj.get("id").and_then(Value::as_str).and_then(decode_base36) {
        *next = (*next).max(n.saturating_add(1));
    }
    let Some(value) = obj.get("value").and_then(Value::as_object) else {
        return;
    };

    let mut sequences: Vec<&Vec<Value>> = Vec::new();
    if let Some(arr) = value.get("modules").and_then(Value::as_array) {
        sequences.push(arr);
    }
    // Legacy loop wrapper.
    if let Some(arr) = value
        .get("value")
        .and_then(Value::as_object)
        .and_then(|w| w.get("modules"))
        .and_then(Value::as_array)
    {
        sequences.push(arr);
    }
    if let Some(arr) = value.get("default").and_then(Value::as_array) {
        sequences.push(arr);
    }
    if let Some(branches) = value.get("branches").and_then(Value::as_array) {
        for branch in branches {
            if let Some(arr) = branch.get("modules").and_then(Value::as_array) {
                sequences.push(arr);
            }
        }
    }
    for seq in sequences {
        for child in seq {
            scan_module_ids(child, next);
        }
    }
}
