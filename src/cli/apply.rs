//! Run a script against a source document

use serde_json::Value;

use super::CliError;
use crate::Mapping;

/// Options for the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Mapping script text
    pub script: String,
    /// Source document JSON
    pub source: Option<String>,
    /// Initial target document JSON, `{}` when absent
    pub target: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Compiles the script, applies it and returns the serialized target.
pub fn execute_apply(options: &ApplyOptions) -> Result<String, CliError> {
    let mapping = Mapping::compile(&options.script)?;

    let source: Value = serde_json::from_str(options.source.as_deref().ok_or(CliError::NoInput)?)?;
    let mut target: Value = match &options.target {
        Some(text) => serde_json::from_str(text)?,
        None => Value::Object(Default::default()),
    };

    mapping.apply(&source, &mut target)?;

    let output = if options.pretty {
        serde_json::to_string_pretty(&target)?
    } else {
        serde_json::to_string(&target)?
    };
    Ok(output)
}
