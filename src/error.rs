use thiserror::Error;

/// Errors raised while migrating a raw document to the canonical shape.
/// Migration never repairs these: the document is rejected whole.
#[derive(Error, Debug, Clone)]
pub enum StructuralError {
    #[error("Flow document root must be an object")]
    RootNotAnObject,

    #[error("Expected a module sequence at '{path}'")]
    ExpectedSequence { path: String },

    #[error("Module at '{path}' is not an object")]
    ModuleNotAnObject { path: String },

    #[error("Branch at '{path}' is not an object")]
    BranchNotAnObject { path: String },

    #[error("Module '{module_id}' has no 'value' object")]
    MissingValue { module_id: String },

    #[error("Module '{module_id}' has no module type tag")]
    MissingType { module_id: String },

    #[error("Module '{module_id}' has an unknown module type: '{type_name}'")]
    UnknownModuleType {
        module_id: String,
        type_name: String,
    },

    #[error("Loop module '{module_id}' carries a nested wrapper that is not an object")]
    LoopWrapperNotAnObject { module_id: String },

    #[error("Branch module '{module_id}' uses a nested legacy shape with no defined migration")]
    LegacyBranchNesting { module_id: String },
}

/// Errors raised when loading a JSON document end to end (parse, migrate,
/// deserialize into the typed model).
#[derive(Error, Debug, Clone)]
pub enum FlowLoadError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParse(String),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("Canonical document did not deserialize: {0}")]
    Deserialize(String),
}

/// Errors raised by tree-editing operations.
#[derive(Error, Debug, Clone)]
pub enum EditError {
    #[error("Module '{0}' not found in the flow")]
    ModuleNotFound(String),
}

/// Errors raised when converting a custom user format into a keiro
/// `FlowValue`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised by artifact persistence.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("{0}")]
    Generic(String),
}
