//! Source side of a statement: walking the input document.
//!
//! A [`SourcePath`] is a pipeline of [`SourceStep`]s. Each [`Binding`]
//! entering a step turns into zero or more bindings leaving it, so
//! `a[$(k)].b[$(i)]` yields one binding per `(k, i)` pair that exists.
//! Everything is lazy; nothing is read until the iterator is pulled.

use std::{borrow::Cow, iter};

use serde_json::Value;
use tracing::trace;

use crate::{
    ast::{MappingToken, MappingTree, RuleType, TokenType},
    value::{scalar_text, walk},
};

/// A position in the source document plus the variables bound on the way
/// there.
///
/// Each step extends a copy, so sibling branches never see each other's
/// variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'a> {
    pub value: &'a Value,
    variables: Vec<(String, String)>,
}

impl<'a> Binding<'a> {
    pub fn root(value: &'a Value) -> Self {
        Binding {
            value,
            variables: Vec::new(),
        }
    }

    fn descend(&self, value: &'a Value) -> Self {
        Binding {
            value,
            variables: self.variables.clone(),
        }
    }

    fn bind(&mut self, name: &str, value: String) {
        match self.variables.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.variables.push((name.to_string(), value)),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Bound variables in binding order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// What an indexed variable binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Property name, or element index for arrays
    Key,
    /// Scalar found by following these property names from the element
    Value(Vec<String>),
}

/// A `*`-glob over text. Literal parts must appear in order without
/// overlapping; unanchored ends allow anything before or after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glob {
    pub anchored_start: bool,
    pub anchored_end: bool,
    pub parts: Vec<String>,
}

impl Glob {
    pub fn is_match(&self, text: &str) -> bool {
        let mut parts = self.parts.as_slice();
        let mut rest = text;

        if self.anchored_start {
            if let Some((first, others)) = parts.split_first() {
                let Some(remaining) = rest.strip_prefix(first.as_str()) else {
                    return false;
                };
                rest = remaining;
                parts = others;
            }
        }

        if self.anchored_end {
            match parts.split_last() {
                Some((last, others)) => {
                    let Some(remaining) = rest.strip_suffix(last.as_str()) else {
                        return false;
                    };
                    rest = remaining;
                    parts = others;
                }
                None => return rest.is_empty(),
            }
        }

        for part in parts {
            match rest.find(part.as_str()) {
                Some(at) => rest = &rest[at + part.len()..],
                None => return false,
            }
        }

        true
    }
}

/// Boolean filter over a text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Or(Vec<FilterExpr>),
    And(Vec<FilterExpr>),
    Not(Box<FilterExpr>),
    Glob(Glob),
}

impl FilterExpr {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            FilterExpr::Or(operands) => operands.iter().any(|e| e.is_match(text)),
            FilterExpr::And(operands) => operands.iter().all(|e| e.is_match(text)),
            FilterExpr::Not(inner) => !inner.is_match(text),
            FilterExpr::Glob(glob) => glob.is_match(text),
        }
    }
}

/// `{expr}` tests the bound value, `{path: expr}` the scalar at `path`
/// under the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFilter {
    pub path: Option<Vec<String>>,
    pub expr: FilterExpr,
}

/// One variable of an indexed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCapture {
    pub name: String,
    pub capture: Capture,
    pub filter: Option<ValueFilter>,
}

impl VariableCapture {
    /// Value to bind for `child`, or `None` when the element has to be
    /// skipped.
    fn resolve(&self, key: &str, child: &Value) -> Option<String> {
        let value = match &self.capture {
            Capture::Key => key.to_string(),
            Capture::Value(path) => scalar_text(walk(child, path)?)?,
        };

        if let Some(filter) = &self.filter {
            let tested: Cow<'_, str> = match &filter.path {
                Some(path) => Cow::Owned(scalar_text(walk(child, path)?)?),
                None => Cow::Borrowed(&value),
            };
            if !filter.expr.is_match(&tested) {
                return None;
            }
        }

        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStep {
    /// Descend into a named property of an object
    Property(String),
    /// Iterate every property or element, binding variables
    Indexed(Vec<VariableCapture>),
}

type Bindings<'a> = Box<dyn Iterator<Item = Binding<'a>> + 'a>;

impl SourceStep {
    fn expand<'a>(&'a self, binding: Binding<'a>) -> Bindings<'a> {
        match self {
            SourceStep::Property(name) => {
                let found = binding.value.as_object().and_then(|m| m.get(name));
                Box::new(found.map(|value| binding.descend(value)).into_iter())
            }
            SourceStep::Indexed(captures) => {
                let children: Box<dyn Iterator<Item = (Cow<'a, str>, &'a Value)>> =
                    match binding.value {
                        Value::Object(map) => {
                            Box::new(map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)))
                        }
                        Value::Array(items) => Box::new(
                            items
                                .iter()
                                .enumerate()
                                .map(|(i, v)| (Cow::Owned(i.to_string()), v)),
                        ),
                        _ => Box::new(iter::empty()),
                    };

                Box::new(children.filter_map(move |(key, child)| {
                    let mut next = binding.descend(child);
                    for capture in captures {
                        let value = capture.resolve(&key, child)?;
                        next.bind(&capture.name, value);
                    }
                    trace!(key = %key, "indexed step matched");
                    Some(next)
                }))
            }
        }
    }
}

/// The compiled source side of a statement.
///
/// An empty path yields the document root once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePath {
    pub steps: Vec<SourceStep>,
}

impl SourcePath {
    /// Builds the pipeline from a [`RuleType::Source`] node.
    pub fn from_tree(source: &MappingTree) -> Self {
        let steps = source
            .children()
            .iter()
            .filter_map(|node| match node.rule()? {
                RuleType::SNode => {
                    let token = node.first_token()?;
                    Some(SourceStep::Property(token.value().into_owned()))
                }
                RuleType::SIndexedNode => Some(SourceStep::Indexed(
                    node.children_of(RuleType::SIndexedNodeContent)
                        .filter_map(variable_capture)
                        .collect(),
                )),
                _ => None,
            })
            .collect();
        SourcePath { steps }
    }

    /// Every binding the path produces over `document`, in document order.
    pub fn extract<'a>(&'a self, document: &'a Value) -> impl Iterator<Item = Binding<'a>> + 'a {
        let mut bindings: Bindings<'a> = Box::new(iter::once(Binding::root(document)));
        for step in &self.steps {
            bindings = Box::new(bindings.flat_map(move |b| step.expand(b)));
        }
        bindings
    }
}

fn path_names(path: &MappingTree) -> Vec<String> {
    path.tokens()
        .into_iter()
        .map(|t| t.value().into_owned())
        .collect()
}

fn variable_capture(content: &MappingTree) -> Option<VariableCapture> {
    let name = content
        .children()
        .iter()
        .filter_map(|c| c.as_token())
        .find(|t| t.kind == TokenType::Variable)?
        .value()
        .into_owned();

    let capture = match content.child(RuleType::SPropertyValueCapture) {
        Some(node) => Capture::Value(
            node.child(RuleType::SPropertyValuePath)
                .map(path_names)
                .unwrap_or_default(),
        ),
        None => Capture::Key,
    };

    let filter = content.child(RuleType::SFilter).and_then(|node| {
        let expr = node.child(RuleType::SFilterExpressionOr)?;
        Some(ValueFilter {
            path: node.child(RuleType::SPropertyValuePath).map(path_names),
            expr: filter_expr(expr),
        })
    });

    Some(VariableCapture {
        name,
        capture,
        filter,
    })
}

/// Builds a filter from an `SFilterExpressionOr`, `SFilterExpressionAnd` or
/// `SFilterValue` node. Single-operand groups collapse.
fn filter_expr(node: &MappingTree) -> FilterExpr {
    let operands = || {
        node.children()
            .iter()
            .filter(|c| c.rule().is_some())
            .map(filter_expr)
            .collect::<Vec<_>>()
    };

    match node.rule() {
        Some(RuleType::SFilterExpressionOr) => collapse(operands(), FilterExpr::Or),
        Some(RuleType::SFilterExpressionAnd) => collapse(operands(), FilterExpr::And),
        _ => glob(&node.tokens()),
    }
}

fn collapse(mut operands: Vec<FilterExpr>, group: fn(Vec<FilterExpr>) -> FilterExpr) -> FilterExpr {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        group(operands)
    }
}

fn glob(tokens: &[&MappingToken]) -> FilterExpr {
    let (negated, tokens) = match tokens.split_first() {
        Some((first, rest)) if first.kind == TokenType::ExclamationMark => (true, rest),
        _ => (false, tokens),
    };

    let is_wild = |t: Option<&&MappingToken>| t.is_some_and(|t| t.kind == TokenType::WildCard);
    let mut parts: Vec<String> = Vec::new();
    let mut after_wildcard = true;
    for token in tokens {
        if token.kind == TokenType::WildCard {
            after_wildcard = true;
            continue;
        }
        match parts.last_mut() {
            Some(last) if !after_wildcard => last.push_str(&token.value()),
            _ => parts.push(token.value().into_owned()),
        }
        after_wildcard = false;
    }

    let glob = FilterExpr::Glob(Glob {
        anchored_start: !is_wild(tokens.first()),
        anchored_end: !is_wild(tokens.last()),
        parts,
    });

    if negated {
        FilterExpr::Not(Box::new(glob))
    } else {
        glob
    }
}
