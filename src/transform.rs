//! Target side of a statement: writing into the output document.
//!
//! A [`TargetPath`] is a chain of [`TargetSegment`]s walked once per
//! [`Binding`]. Every segment may be gated by a [`Condition`]; a gated-out
//! segment abandons the whole chain for that binding, and objects created
//! along the way are only attached once the rest of the chain succeeds, so
//! an abandoned chain leaves the target untouched.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::trace;

use crate::{
    ast::{MappingTree, RuleType, TokenType},
    error::ExecError,
    extract::Binding,
    value::merge_property,
};

/// When a segment is allowed to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    Always,
    /// `!`: only when the property does not exist yet
    IfAbsent,
    /// `?`: only when the property already exists
    IfPresent,
}

impl Condition {
    fn allows(self, present: bool) -> bool {
        match self {
            Condition::Always => true,
            Condition::IfAbsent => !present,
            Condition::IfPresent => present,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePart {
    Literal(String),
    Variable(String),
}

/// A property name, possibly assembled from bound variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyName {
    pub parts: Vec<NamePart>,
}

impl PropertyName {
    pub fn fixed(name: impl Into<String>) -> Self {
        PropertyName {
            parts: vec![NamePart::Literal(name.into())],
        }
    }

    pub fn resolve<'b>(&'b self, binding: &'b Binding<'_>) -> Result<Cow<'b, str>, ExecError> {
        if let [part] = self.parts.as_slice() {
            return part_text(part, binding).map(Cow::Borrowed);
        }
        let mut name = String::new();
        for part in &self.parts {
            name.push_str(part_text(part, binding)?);
        }
        Ok(Cow::Owned(name))
    }
}

fn part_text<'b>(part: &'b NamePart, binding: &'b Binding<'_>) -> Result<&'b str, ExecError> {
    match part {
        NamePart::Literal(text) => Ok(text),
        NamePart::Variable(name) => binding
            .variable(name)
            .ok_or_else(|| ExecError::UnboundVariable(name.clone())),
    }
}

/// `{path.to.prop: $(var)}`: writes a variable's value at a path under the
/// node the segment located or created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideAssignment {
    pub path: Vec<PropertyName>,
    pub variable: String,
}

impl SideAssignment {
    fn apply(&self, node: &mut Map<String, Value>, binding: &Binding<'_>) -> Result<(), ExecError> {
        let Some((leaf, parents)) = self.path.split_last() else {
            return Ok(());
        };

        let mut current = node;
        for parent in parents {
            current = object_slot(current, parent.resolve(binding)?.into_owned());
        }

        let value = binding
            .variable(&self.variable)
            .ok_or_else(|| ExecError::UnboundVariable(self.variable.clone()))?;
        merge_property(current, &leaf.resolve(binding)?, &Value::String(value.to_string()));
        Ok(())
    }
}

/// One step of a target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSegment {
    pub name: PropertyName,
    /// Written with `[]`: the property holds an array that gets appended to
    pub array: bool,
    pub condition: Condition,
    pub assignments: Vec<SideAssignment>,
}

impl TargetSegment {
    fn assign(&self, node: &mut Value, binding: &Binding<'_>) -> Result<(), ExecError> {
        if let Value::Object(map) = node {
            for assignment in &self.assignments {
                assignment.apply(map, binding)?;
            }
        }
        Ok(())
    }
}

/// The compiled target side of a statement. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    pub segments: Vec<TargetSegment>,
}

impl TargetPath {
    /// Builds the chain from a [`RuleType::Target`] node.
    pub fn from_tree(target: &MappingTree) -> Self {
        let segments = target
            .children()
            .iter()
            .filter(|node| node.rule().is_some())
            .map(segment)
            .collect();
        TargetPath { segments }
    }

    /// Writes the bound value into `target`.
    ///
    /// Returns whether the chain ran to the end; `false` means a condition
    /// gated it out and nothing changed.
    pub fn apply(&self, target: &mut Map<String, Value>, binding: &Binding<'_>) -> Result<bool, ExecError> {
        update(&self.segments, target, binding)
    }
}

fn update(
    segments: &[TargetSegment],
    target: &mut Map<String, Value>,
    binding: &Binding<'_>,
) -> Result<bool, ExecError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(false);
    };

    let name = segment.name.resolve(binding)?.into_owned();
    let present = target.contains_key(&name);
    if !segment.condition.allows(present) {
        trace!(property = %name, present, "condition gated out update");
        return Ok(false);
    }

    if rest.is_empty() {
        let node = if segment.array {
            let items = array_slot(target, name);
            items.push(binding.value.clone());
            items.last_mut()
        } else {
            merge_property(target, &name, binding.value);
            target.get_mut(&name)
        };
        if let Some(node) = node {
            segment.assign(node, binding)?;
        }
        return Ok(true);
    }

    if !segment.array {
        if let Some(Value::Object(existing)) = target.get_mut(&name) {
            let done = update(rest, existing, binding)?;
            if done {
                if let Some(node) = target.get_mut(&name) {
                    segment.assign(node, binding)?;
                }
            }
            return Ok(done);
        }
    }

    let mut created = Map::new();
    if !update(rest, &mut created, binding)? {
        return Ok(false);
    }
    let mut created = Value::Object(created);
    segment.assign(&mut created, binding)?;
    if segment.array {
        array_slot(target, name).push(created);
    } else {
        target.insert(name, created);
    }
    Ok(true)
}

/// The object stored under `name`, replacing anything else found there.
fn object_slot(target: &mut Map<String, Value>, name: String) -> &mut Map<String, Value> {
    let slot = target
        .entry(name)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}

/// The array stored under `name`, replacing anything else found there.
fn array_slot(target: &mut Map<String, Value>, name: String) -> &mut Vec<Value> {
    let slot = target
        .entry(name)
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just made an array"),
    }
}

fn segment(node: &MappingTree) -> TargetSegment {
    let name = match node.rule() {
        Some(RuleType::TIndexedNode) => PropertyName {
            parts: node
                .child(RuleType::TIndexedName)
                .map(|n| n.tokens())
                .unwrap_or_default()
                .into_iter()
                .map(|t| match t.kind {
                    TokenType::Variable => NamePart::Variable(t.value().into_owned()),
                    _ => NamePart::Literal(t.value().into_owned()),
                })
                .collect(),
        },
        _ => PropertyName::fixed(
            node.first_token()
                .map(|t| t.value().into_owned())
                .unwrap_or_default(),
        ),
    };

    let array = node
        .children()
        .iter()
        .filter_map(|c| c.as_token())
        .any(|t| t.kind == TokenType::ArrayMarker);

    let condition = match node
        .child(RuleType::TConditionalModifier)
        .and_then(|c| c.first_token())
        .map(|t| t.kind)
    {
        Some(TokenType::ExclamationMark) => Condition::IfAbsent,
        Some(TokenType::QuestionMark) => Condition::IfPresent,
        _ => Condition::Always,
    };

    let assignments = node
        .child(RuleType::TPropertyValue)
        .map(|values| {
            values
                .children_of(RuleType::TPropertyValueAssignment)
                .filter_map(side_assignment)
                .collect()
        })
        .unwrap_or_default();

    TargetSegment {
        name,
        array,
        condition,
        assignments,
    }
}

fn side_assignment(node: &MappingTree) -> Option<SideAssignment> {
    let path = node
        .child(RuleType::TPropertyValuePath)?
        .tokens()
        .into_iter()
        .map(|t| match t.kind {
            TokenType::Variable => PropertyName {
                parts: vec![NamePart::Variable(t.value().into_owned())],
            },
            _ => PropertyName::fixed(t.value()),
        })
        .collect();
    let variable = node
        .children()
        .iter()
        .filter_map(|c| c.as_token())
        .find(|t| t.kind == TokenType::Variable)?
        .value()
        .into_owned();
    Some(SideAssignment { path, variable })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Capture, SourcePath, SourceStep, VariableCapture};
    use serde_json::json;

    fn fixed(name: &str) -> TargetSegment {
        TargetSegment {
            name: PropertyName::fixed(name),
            array: false,
            condition: Condition::Always,
            assignments: Vec::new(),
        }
    }

    fn run(path: &TargetPath, target: Value, value: &Value) -> (bool, Value) {
        let Value::Object(mut map) = target else {
            panic!("target must be an object");
        };
        let done = path.apply(&mut map, &Binding::root(value)).unwrap();
        (done, Value::Object(map))
    }

    #[test]
    fn test_creates_missing_objects() {
        let path = TargetPath {
            segments: vec![fixed("a"), fixed("b")],
        };
        let (done, target) = run(&path, json!({}), &json!(5));
        assert!(done);
        assert_eq!(target, json!({"a": {"b": 5}}));
    }

    #[test]
    fn test_gated_deep_segment_leaves_target_untouched() {
        let mut last = fixed("c");
        last.condition = Condition::IfPresent;
        let path = TargetPath {
            segments: vec![fixed("a"), fixed("b"), last],
        };
        let (done, target) = run(&path, json!({"x": 1}), &json!(5));
        assert!(!done);
        assert_eq!(target, json!({"x": 1}));
    }

    #[test]
    fn test_non_object_intermediate_is_replaced() {
        let path = TargetPath {
            segments: vec![fixed("a"), fixed("b")],
        };
        let (_, target) = run(&path, json!({"a": 3}), &json!(5));
        assert_eq!(target, json!({"a": {"b": 5}}));
    }

    #[test]
    fn test_array_segments_append() {
        let mut list = fixed("list");
        list.array = true;
        let path = TargetPath {
            segments: vec![list.clone(), fixed("v")],
        };
        let (_, target) = run(&path, json!({"list": [{"v": 0}]}), &json!(1));
        assert_eq!(target, json!({"list": [{"v": 0}, {"v": 1}]}));

        let path = TargetPath {
            segments: vec![list],
        };
        let (_, target) = run(&path, json!({"list": "scalar"}), &json!(1));
        assert_eq!(target, json!({"list": [1]}));
    }

    #[test]
    fn test_side_assignment_creates_path() {
        let mut node = fixed("a");
        node.assignments.push(SideAssignment {
            path: vec![PropertyName::fixed("meta"), PropertyName::fixed("tag")],
            variable: "k".to_string(),
        });
        let path = TargetPath {
            segments: vec![node],
        };

        let source = SourcePath {
            steps: vec![SourceStep::Indexed(vec![VariableCapture {
                name: "k".to_string(),
                capture: Capture::Key,
                filter: None,
            }])],
        };
        let doc = json!({"x": {"y": 1}});
        let bindings: Vec<_> = source.extract(&doc).collect();
        assert_eq!(bindings.len(), 1);

        let mut target = Map::new();
        assert!(path.apply(&mut target, &bindings[0]).unwrap());
        assert_eq!(
            Value::Object(target),
            json!({"a": {"y": 1, "meta": {"tag": "x"}}})
        );
    }

    #[test]
    fn test_side_assignment_skips_scalar_nodes() {
        let mut node = fixed("a");
        node.assignments.push(SideAssignment {
            path: vec![PropertyName::fixed("meta")],
            variable: "k".to_string(),
        });
        let path = TargetPath {
            segments: vec![node],
        };
        let (done, target) = run(&path, json!({}), &json!(7));
        assert!(done);
        assert_eq!(target, json!({"a": 7}));
    }

    #[test]
    fn test_composite_name_needs_bound_variables() {
        let name = PropertyName {
            parts: vec![
                NamePart::Literal("id_".to_string()),
                NamePart::Variable("k".to_string()),
            ],
        };
        let doc = json!(null);
        let error = name.resolve(&Binding::root(&doc)).unwrap_err();
        assert_eq!(error, ExecError::UnboundVariable("k".to_string()));
    }
}
