//! Compiled mappings.
//!
//! [`Mapping::compile`] runs the whole front end once:
//!
//! ```text
//! text -> tokenize -> split statements -> expand partials -> parse -> validate
//! ```
//!
//! and keeps one [`Statement`] per line, each holding its parse tree and the
//! source and target paths built from it. [`Mapping::apply`] can then be
//! called any number of times.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    ast::{MappingTree, RuleType},
    error::{CompileError, ExecError},
    extract::{Binding, SourcePath},
    lexer::tokenize,
    parser::parse_statement,
    position::LineIndex,
    preprocess::{expand_partials, split_statements},
    transform::TargetPath,
    validate::validate,
    value::{merge_property, type_name},
};

/// One compiled `target = source` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    tree: MappingTree,
    source: SourcePath,
    target: Option<TargetPath>,
}

impl Statement {
    fn new(tree: MappingTree) -> Self {
        let source = tree
            .child(RuleType::Source)
            .map(SourcePath::from_tree)
            .unwrap_or_default();
        let target = tree.child(RuleType::Target).map(TargetPath::from_tree);
        Statement {
            tree,
            source,
            target,
        }
    }

    /// The validated parse tree, rooted at [`RuleType::Mapping`].
    pub fn tree(&self) -> &MappingTree {
        &self.tree
    }

    pub fn source(&self) -> &SourcePath {
        &self.source
    }

    /// `None` for statements that merge into the target root.
    pub fn target(&self) -> Option<&TargetPath> {
        self.target.as_ref()
    }

    /// Every binding the source side yields for `document`.
    pub fn extract<'a>(&'a self, document: &'a Value) -> impl Iterator<Item = Binding<'a>> + 'a {
        self.source.extract(document)
    }

    /// Applies the statement, returning how many bindings reached the
    /// target.
    pub fn apply(&self, source: &Value, target: &mut Map<String, Value>) -> Result<usize, ExecError> {
        let mut applied = 0;
        for binding in self.extract(source) {
            trace!(variables = ?binding.variables().collect::<Vec<_>>(), "binding");
            let written = match &self.target {
                Some(path) => path.apply(target, &binding)?,
                None => {
                    merge_root(target, binding.value)?;
                    true
                }
            };
            if written {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

fn merge_root(target: &mut Map<String, Value>, value: &Value) -> Result<(), ExecError> {
    let Value::Object(properties) = value else {
        return Err(ExecError::RootMergeRequiresObject {
            found: type_name(value),
        });
    };
    for (name, value) in properties {
        merge_property(target, name, value);
    }
    Ok(())
}

/// A compiled mapping script.
///
/// # Examples
///
/// ```
/// use jmap_lang::Mapping;
/// use serde_json::json;
///
/// let mapping = Mapping::compile("people[$(id)].name = applicants[$(id)].fullName").unwrap();
///
/// let source = json!({"applicants": {"a1": {"fullName": "Ada"}, "a2": {"fullName": "Bob"}}});
/// let mut target = json!({});
/// mapping.apply(&source, &mut target).unwrap();
///
/// assert_eq!(target, json!({"people": {"a1": {"name": "Ada"}, "a2": {"name": "Bob"}}}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    statements: Vec<Statement>,
}

impl Mapping {
    /// Compiles `script`. Nothing is returned unless every statement
    /// compiles.
    pub fn compile(script: &str) -> Result<Self, CompileError> {
        let index = LineIndex::new(script);
        Self::compile_statements(script).map_err(|e| e.locate(&index))
    }

    fn compile_statements(script: &str) -> Result<Self, CompileError> {
        let tokens = tokenize(script);
        debug!(tokens = tokens.len(), "tokenized script");

        let statements = expand_partials(split_statements(tokens))?;
        debug!(statements = statements.len(), "preprocessed script");

        let mut compiled = Vec::with_capacity(statements.len());
        for tokens in &statements {
            let tree = parse_statement(tokens)?;
            validate(&tree)?;
            compiled.push(Statement::new(tree));
        }
        debug!(statements = compiled.len(), "compiled mapping");

        Ok(Mapping {
            statements: compiled,
        })
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Runs every statement in order against `source`, writing into
    /// `target`, which has to be an object.
    pub fn apply(&self, source: &Value, target: &mut Value) -> Result<(), ExecError> {
        let target = match target {
            Value::Object(map) => map,
            other => {
                return Err(ExecError::TargetNotObject {
                    found: type_name(other),
                });
            }
        };

        for (i, statement) in self.statements.iter().enumerate() {
            let applied = statement.apply(source, target)?;
            debug!(statement = i, applied, "applied statement");
        }
        Ok(())
    }
}

impl FromStr for Mapping {
    type Err = CompileError;

    fn from_str(script: &str) -> Result<Self, Self::Err> {
        Mapping::compile(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statements_run_in_order() {
        let mapping = Mapping::compile("a = x\na = y").unwrap();
        let mut target = json!({});
        mapping
            .apply(&json!({"x": {"p": 1}, "y": {"q": 2}}), &mut target)
            .unwrap();
        assert_eq!(target, json!({"a": {"p": 1, "q": 2}}));
    }

    #[test]
    fn test_target_must_be_object() {
        let mapping = Mapping::compile("a = x").unwrap();
        let error = mapping.apply(&json!({}), &mut json!([])).unwrap_err();
        assert_eq!(error, ExecError::TargetNotObject { found: "array" });
    }

    #[test]
    fn test_root_merge_requires_object() {
        let mapping = Mapping::compile("= x").unwrap();
        let error = mapping
            .apply(&json!({"x": 3}), &mut json!({}))
            .unwrap_err();
        assert_eq!(error, ExecError::RootMergeRequiresObject { found: "number" });
    }

    #[test]
    fn test_from_str() {
        let mapping: Mapping = "a = b\n\nc = d".parse().unwrap();
        assert_eq!(mapping.len(), 2);
    }
}
