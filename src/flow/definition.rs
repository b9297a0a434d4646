use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Retry schedules never exceed this many attempts, whatever the document says.
pub const MAX_RETRY_ATTEMPTS: u16 = 1000;
/// Upper bound on the delay between two retry attempts.
pub const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// The complete, canonical definition of a flow document.
/// This is what a migrated document deserializes into and what every
/// traversal, selection, and editing operation works on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FlowValue {
    pub modules: Vec<FlowModule>,
    /// Error-handler step, run when the main sequence fails. Not part of the
    /// main traversal order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_module: Option<Box<FlowModule>>,
}

/// A single node in the flow tree: a leaf action or a composite
/// (loop or branch set), plus orthogonal per-node policies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowModule {
    /// Unique within the document, stable across edits once assigned.
    pub id: String,
    pub value: FlowModuleValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_after_if: Option<StopAfterIf>,
    /// Delay evaluated before the next module starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<InputTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<Suspend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,
}

impl FlowModule {
    /// A module with the given value and no policies attached.
    pub fn new(id: impl Into<String>, value: FlowModuleValue) -> Self {
        Self {
            id: id.into(),
            value,
            summary: None,
            stop_after_if: None,
            sleep: None,
            suspend: None,
            retry: None,
        }
    }

    /// The not-yet-configured placeholder module.
    pub fn identity(id: impl Into<String>) -> Self {
        Self::new(id, FlowModuleValue::Identity)
    }
}

/// The closed set of module kinds. New kinds are added here and handled in
/// every traversal; field-presence sniffing is never used to dispatch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlowModuleValue {
    /// Reference to a workspace script.
    Script {
        #[serde(default, skip_serializing_if = "transforms_empty")]
        input_transforms: AHashMap<String, InputTransform>,
        path: String,
    },
    /// Inline code carried by the document itself.
    RawScript {
        #[serde(default, skip_serializing_if = "transforms_empty")]
        input_transforms: AHashMap<String, InputTransform>,
        content: String,
        language: ScriptLang,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Reference to another flow, embedded as a single step.
    Flow {
        #[serde(default, skip_serializing_if = "transforms_empty")]
        input_transforms: AHashMap<String, InputTransform>,
        path: String,
    },
    /// Ordered children executed once per iterator element.
    ForloopFlow {
        iterator: InputTransform,
        #[serde(default)]
        modules: Vec<FlowModule>,
        #[serde(default)]
        skip_failures: bool,
    },
    /// Exclusive branch set: the first branch whose predicate matches runs,
    /// otherwise the default sequence.
    BranchOne {
        branches: Vec<Branch>,
        #[serde(default)]
        default: Vec<FlowModule>,
    },
    /// Parallel branch set: branch order is declaration order only.
    BranchAll {
        branches: Vec<BranchAllBranch>,
        #[serde(default = "default_true")]
        parallel: bool,
    },
    /// Pass-through placeholder for a module not yet configured.
    Identity,
}

fn default_true() -> bool {
    true
}

fn transforms_empty(map: &AHashMap<String, InputTransform>) -> bool {
    map.is_empty()
}

impl FlowModuleValue {
    /// Whether this module has no nested modules.
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            FlowModuleValue::ForloopFlow { .. }
                | FlowModuleValue::BranchOne { .. }
                | FlowModuleValue::BranchAll { .. }
        )
    }

    /// The serialized tag of this kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowModuleValue::Script { .. } => "script",
            FlowModuleValue::RawScript { .. } => "rawscript",
            FlowModuleValue::Flow { .. } => "flow",
            FlowModuleValue::ForloopFlow { .. } => "forloopflow",
            FlowModuleValue::BranchOne { .. } => "branchone",
            FlowModuleValue::BranchAll { .. } => "branchall",
            FlowModuleValue::Identity => "identity",
        }
    }
}

impl fmt::Display for FlowModuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// One predicate-guarded sequence inside an exclusive branch set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Branch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Predicate expression deciding whether this branch is taken.
    pub expr: String,
    pub modules: Vec<FlowModule>,
}

/// One sequence inside a parallel branch set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BranchAllBranch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skip_failure: bool,
    pub modules: Vec<FlowModule>,
}

/// Languages an inline script can be written in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLang {
    Deno,
    Python3,
    Go,
    Bash,
}

/// How a single input parameter gets its value: a literal, or an expression
/// evaluated against prior results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputTransform {
    Static { value: serde_json::Value },
    Javascript { expr: String },
}

/// Early-stop policy: stop the flow after this module when `expr` is true.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StopAfterIf {
    pub expr: String,
    #[serde(default)]
    pub skip_if_stopped: bool,
}

/// Approval gate: the flow parks after this module until enough resume
/// events arrive, or times out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Suspend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_events: Option<u16>,
    /// Seconds before a parked flow gives up waiting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// Retry policy: a run of constant-delay attempts followed by a run of
/// exponentially growing delays.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Retry {
    #[serde(default)]
    pub constant: ConstantDelay,
    #[serde(default)]
    pub exponential: ExponentialDelay,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ConstantDelay {
    #[serde(default)]
    pub attempts: u16,
    #[serde(default)]
    pub seconds: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExponentialDelay {
    #[serde(default)]
    pub attempts: u16,
    #[serde(default = "ExponentialDelay::default_multiplier")]
    pub multiplier: u16,
    #[serde(default)]
    pub seconds: u16,
}

impl ExponentialDelay {
    fn default_multiplier() -> u16 {
        2
    }
}

impl Default for ExponentialDelay {
    fn default() -> Self {
        Self {
            attempts: 0,
            multiplier: Self::default_multiplier(),
            seconds: 0,
        }
    }
}

impl Retry {
    pub fn has_attempts(&self) -> bool {
        self.constant.attempts != 0 || self.exponential.attempts != 0
    }

    pub fn max_attempts(&self) -> u16 {
        self.constant
            .attempts
            .saturating_add(self.exponential.attempts)
            .min(MAX_RETRY_ATTEMPTS)
    }

    /// Delay before the attempt following `previous_attempts` failures, or
    /// `None` once the schedule is exhausted.
    pub fn interval(&self, previous_attempts: u16) -> Option<Duration> {
        if previous_attempts >= self.max_attempts() {
            return None;
        }
        let delay = if previous_attempts < self.constant.attempts {
            Duration::from_secs(self.constant.seconds as u64)
        } else {
            let exp = previous_attempts - self.constant.attempts;
            let factor = (self.exponential.multiplier as u64).saturating_pow(exp as u32);
            Duration::from_secs((self.exponential.seconds as u64).saturating_mul(factor))
        };
        Some(delay.min(MAX_RETRY_INTERVAL))
    }
}
