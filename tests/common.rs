//! Common test utilities for building flow documents and modules.
use keiro::prelude::*;

/// A minimal inline-script action.
#[allow(dead_code)]
pub fn rawscript(id: &str) -> FlowModule {
    FlowModule::new(
        id,
        FlowModuleValue::RawScript {
            input_transforms: Default::default(),
            content: "export function main() { return 1; }".to_string(),
            language: ScriptLang::Deno,
            path: None,
        },
    )
}

#[allow(dead_code)]
pub fn identity(id: &str) -> FlowModule {
    FlowModule::identity(id)
}

#[allow(dead_code)]
pub fn forloop(id: &str, children: Vec<FlowModule>) -> FlowModule {
    FlowModule::new(
        id,
        FlowModuleValue::ForloopFlow {
            iterator: InputTransform::Javascript {
                expr: "previous_result.items".to_string(),
            },
            modules: children,
            skip_failures: false,
        },
    )
}

#[allow(dead_code)]
pub fn branchone(
    id: &str,
    branches: Vec<(&str, Vec<FlowModule>)>,
    default: Vec<FlowModule>,
) -> FlowModule {
    FlowModule::new(
        id,
        FlowModuleValue::BranchOne {
            branches: branches
                .into_iter()
                .map(|(expr, modules)| Branch {
                    summary: None,
                    expr: expr.to_string(),
                    modules,
                })
                .collect(),
            default,
        },
    )
}

#[allow(dead_code)]
pub fn branchall(id: &str, branches: Vec<Vec<FlowModule>>) -> FlowModule {
    FlowModule::new(
        id,
        FlowModuleValue::BranchAll {
            branches: branches
                .into_iter()
                .map(|modules| BranchAllBranch {
                    summary: None,
                    skip_failure: false,
                    modules,
                })
                .collect(),
            parallel: true,
        },
    )
}

#[allow(dead_code)]
pub fn flow_of(modules: Vec<FlowModule>) -> FlowValue {
    FlowValue {
        modules,
        failure_module: None,
    }
}

/// A document mixing every legacy shape migration handles: a missing id with
/// staged transforms and a split stop condition, a doubly-nested loop whose
/// child uses the singular transform field, and an already-canonical module.
#[allow(dead_code)]
pub const LEGACY_FLOW_JSON: &str = r#"{
    "modules": [
        {
            "input_transforms": { "x": { "type": "static", "value": 1 } },
            "stop_after_if_expr": "result == false",
            "skip_if_stopped": true,
            "value": {
                "type": "rawscript",
                "content": "export function main(x: number) { return x; }",
                "language": "deno"
            }
        },
        {
            "value": {
                "type": "forloopflow",
                "iterator": { "type": "javascript", "expr": "result.items" },
                "value": {
                    "modules": [
                        {
                            "id": "a",
                            "input_transform": { "n": { "type": "static", "value": 2 } },
                            "value": {
                                "type": "rawscript",
                                "content": "def main(n): return n",
                                "language": "python3"
                            }
                        }
                    ]
                }
            }
        },
        { "id": "b", "value": { "type": "identity" } }
    ]
}"#;

/// The doubly-nested legacy loop shape on its own.
#[allow(dead_code)]
pub fn legacy_loop_doc() -> serde_json::Value {
    serde_json::json!({
        "modules": [
            {
                "value": {
                    "type": "forloopflow",
                    "iterator": { "type": "static", "value": [1, 2, 3] },
                    "value": {
                        "modules": [ { "id": "a", "value": { "type": "identity" } } ]
                    }
                }
            }
        ]
    })
}
