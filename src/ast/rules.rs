use std::fmt;

/// Rule types of the mapping grammar.
///
/// `T*` rules describe the target side of a statement, `S*` rules the source
/// side. Several rules only exist to be hoisted and never appear in a
/// finished parse tree (`TFirstNode`, `SSubsequentNode`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleType {
    /// One whole statement: `Target? = Source?`
    Mapping,

    Target,
    TFirstNode,
    TSubsequentNode,
    /// `name` with optional modifiers
    TNode,
    TPathElement,
    /// `[literal$(var)...]` with optional modifiers
    TIndexedNode,
    TIndexedName,
    TIndexedNamePart,
    TNodeModifiers,
    /// `?` or `!`
    TConditionalModifier,
    /// `{path: $(var), ...}` side-assignments
    TPropertyValue,
    TPropertyValueSubsequentAssignment,
    TPropertyValueAssignment,
    TPropertyValuePath,
    TPropertyValuePathElement,
    TPropertyValuePathSubsequentElement,

    Source,
    SFirstNode,
    SSubsequentNode,
    /// Fixed property step
    SNode,
    /// `[$(a)..., $(b)...]` iteration step
    SIndexedNode,
    /// One variable of an indexed step with its capture and filter
    SIndexedNodeContent,
    SIndexedNodeSubsequentContent,
    /// `(:path)`
    SPropertyValueCapture,
    SPropertyValuePath,
    SPropertyValuePathElement,
    SPropertyValuePathSubsequentElement,
    /// `{expr}` or `{path: expr}`
    SFilter,
    SFilterExpressionOr,
    SFilterExpressionAnd,
    SFilterExpressionElement,
    SFilterLogicExpressionAndRHS,
    SFilterLogicExpressionOrRHS,
    /// One glob, possibly negated
    SFilterValue,
    SFilterItem,
    SFilterItemElement,
    SFilterNegatedItem,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
