use super::definition::FlowValue;
use crate::error::FlowConversionError;

/// A trait for custom data models that can be converted into a keiro
/// `FlowValue`.
///
/// This is the extension point for formats that do not go through JSON
/// migration. By implementing this trait on your own document structs, you
/// provide a translation layer that lets every keiro operation (traversal,
/// selection, editing) run on your format.
///
/// # Example
///
/// ```rust,no_run
/// use keiro::error::FlowConversionError;
/// use keiro::flow::{FlowModule, FlowModuleValue, FlowValue, IntoFlow, ScriptLang};
///
/// // 1. Define your custom structs for parsing your format.
/// struct MyStep { id: String, code: String }
/// struct MyPipeline { steps: Vec<MyStep> }
///
/// // 2. Implement `IntoFlow` for your top-level struct.
/// impl IntoFlow for MyPipeline {
///     fn into_flow(self) -> Result<FlowValue, FlowConversionError> {
///         let modules = self
///             .steps
///             .into_iter()
///             .map(|step| {
///                 FlowModule::new(
///                     step.id,
///                     FlowModuleValue::RawScript {
///                         input_transforms: Default::default(),
///                         content: step.code,
///                         language: ScriptLang::Deno,
///                         path: None,
///                     },
///                 )
///             })
///             .collect();
///
///         Ok(FlowValue { modules, failure_module: None })
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a canonical flow document.
    fn into_flow(self) -> Result<FlowValue, FlowConversionError>;
}
