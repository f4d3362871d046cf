//! The mapping grammar.
//!
//! Built once on first use and shared by every compile. Statements reach the
//! parser already stripped of whitespace and comments and with partials
//! expanded (see [`crate::preprocess`]).

use std::sync::LazyLock;

use crate::{
    ast::{MappingToken, MappingTree, RuleType, TokenType},
    grammar::{Alternative, Element, Grammar, GrammarBuilder, GrammarError, SyntaxError},
};

type MappingElement = Element<TokenType, RuleType>;

static GRAMMAR: LazyLock<Grammar<TokenType, RuleType>> = LazyLock::new(|| {
    mapping_grammar().expect("the mapping grammar is well formed")
});

/// Parses one preprocessed statement into a [`RuleType::Mapping`] tree.
pub fn parse_statement(tokens: &[MappingToken]) -> Result<MappingTree, SyntaxError<TokenType>> {
    GRAMMAR.parse(tokens)
}

fn t(kind: TokenType) -> MappingElement {
    Element::token(kind)
}

fn r(rule: RuleType) -> MappingElement {
    Element::rule(rule)
}

/// Punctuation that is required but left out of the tree.
fn punct(kind: TokenType) -> MappingElement {
    Element::token(kind).exclude()
}

/// One single-token alternative per token type except `excluded`.
fn any_token_except(excluded: TokenType) -> Vec<Alternative<TokenType, RuleType>> {
    TokenType::ALL
        .iter()
        .filter(|kind| **kind != excluded)
        .map(|kind| vec![t(*kind)])
        .collect()
}

fn mapping_grammar() -> Result<Grammar<TokenType, RuleType>, GrammarError> {
    use RuleType::*;
    use TokenType::*;

    GrammarBuilder::new()
        .rule(
            Mapping,
            [vec![r(Target).optional(), punct(Equals), r(Source).optional()]],
        )
        // target side
        .rule(
            Target,
            [vec![
                r(TFirstNode).hoist(),
                r(TSubsequentNode).hoist().zero_or_more(),
            ]],
        )
        .rule_one_of_rules(TFirstNode, &[TNode, TIndexedNode])
        .rule(
            TSubsequentNode,
            [vec![punct(Dot), r(TNode)], vec![r(TIndexedNode)]],
        )
        .rule(
            TNode,
            [vec![r(TPathElement).hoist(), r(TNodeModifiers).hoist()]],
        )
        .rule_one_of_tokens(TPathElement, &[Item, QuotedItem])
        .rule(
            TIndexedNode,
            [vec![
                punct(OpenSquareBracket),
                r(TIndexedName),
                punct(CloseSquareBracket),
                r(TNodeModifiers).hoist(),
            ]],
        )
        .rule(TIndexedName, [vec![r(TIndexedNamePart).hoist().one_or_more()]])
        .rule(TIndexedNamePart, any_token_except(CloseSquareBracket))
        .rule(
            TNodeModifiers,
            [vec![
                t(ArrayMarker).optional(),
                r(TPropertyValue).optional(),
                r(TConditionalModifier).optional(),
            ]],
        )
        .rule_one_of_tokens(TConditionalModifier, &[QuestionMark, ExclamationMark])
        .rule(
            TPropertyValue,
            [vec![
                punct(OpenCurlyBracket),
                r(TPropertyValueAssignment),
                r(TPropertyValueSubsequentAssignment).hoist().zero_or_more(),
                punct(CloseCurlyBracket),
            ]],
        )
        .rule(
            TPropertyValueSubsequentAssignment,
            [vec![punct(Comma), r(TPropertyValueAssignment)]],
        )
        .rule(
            TPropertyValueAssignment,
            [vec![r(TPropertyValuePath), punct(Colon), t(Variable)]],
        )
        .rule(
            TPropertyValuePath,
            [vec![
                r(TPropertyValuePathElement).hoist(),
                r(TPropertyValuePathSubsequentElement).hoist().zero_or_more(),
            ]],
        )
        .rule_one_of_tokens(TPropertyValuePathElement, &[Item, QuotedItem, Variable])
        .rule(
            TPropertyValuePathSubsequentElement,
            [vec![punct(Dot), r(TPropertyValuePathElement).hoist()]],
        )
        // source side
        .rule(
            Source,
            [vec![
                r(SFirstNode).hoist(),
                r(SSubsequentNode).hoist().zero_or_more(),
            ]],
        )
        .rule_one_of_rules(SFirstNode, &[SNode, SIndexedNode])
        .rule(
            SSubsequentNode,
            [vec![punct(Dot), r(SNode)], vec![r(SIndexedNode)]],
        )
        .rule_one_of_tokens(SNode, &[Item, QuotedItem])
        .rule(
            SIndexedNode,
            [vec![
                punct(OpenSquareBracket),
                r(SIndexedNodeContent),
                r(SIndexedNodeSubsequentContent).hoist().zero_or_more(),
                punct(CloseSquareBracket),
            ]],
        )
        .rule(
            SIndexedNodeContent,
            [vec![
                t(Variable),
                r(SPropertyValueCapture).optional(),
                r(SFilter).optional(),
            ]],
        )
        .rule(
            SIndexedNodeSubsequentContent,
            [vec![punct(Comma), r(SIndexedNodeContent)]],
        )
        .rule(
            SPropertyValueCapture,
            [vec![
                punct(OpenRoundBracket),
                punct(Colon),
                r(SPropertyValuePath).optional(),
                punct(CloseRoundBracket),
            ]],
        )
        .rule(
            SPropertyValuePath,
            [vec![
                r(SPropertyValuePathElement).hoist(),
                r(SPropertyValuePathSubsequentElement).hoist().zero_or_more(),
            ]],
        )
        .rule_one_of_tokens(SPropertyValuePathElement, &[Item, QuotedItem])
        .rule(
            SPropertyValuePathSubsequentElement,
            [vec![punct(Dot), r(SPropertyValuePathElement).hoist()]],
        )
        // filters
        .rule(
            SFilter,
            [
                vec![
                    punct(OpenCurlyBracket),
                    r(SFilterExpressionOr),
                    punct(CloseCurlyBracket),
                ],
                vec![
                    punct(OpenCurlyBracket),
                    r(SPropertyValuePath),
                    punct(Colon),
                    r(SFilterExpressionOr),
                    punct(CloseCurlyBracket),
                ],
            ],
        )
        .rule(
            SFilterExpressionOr,
            [vec![
                r(SFilterExpressionAnd),
                r(SFilterLogicExpressionOrRHS).hoist().zero_or_more(),
            ]],
        )
        .rule(
            SFilterLogicExpressionOrRHS,
            [vec![punct(Or), r(SFilterExpressionAnd)]],
        )
        .rule(
            SFilterExpressionAnd,
            [vec![
                r(SFilterExpressionElement).hoist(),
                r(SFilterLogicExpressionAndRHS).hoist().zero_or_more(),
            ]],
        )
        .rule(
            SFilterLogicExpressionAndRHS,
            [vec![punct(And), r(SFilterExpressionElement).hoist()]],
        )
        .rule(
            SFilterExpressionElement,
            [
                vec![r(SFilterValue)],
                vec![
                    punct(OpenRoundBracket),
                    r(SFilterExpressionOr),
                    punct(CloseRoundBracket),
                ],
            ],
        )
        .rule(
            SFilterValue,
            [
                vec![r(SFilterItem).hoist()],
                vec![r(SFilterNegatedItem).hoist()],
            ],
        )
        .rule(
            SFilterItem,
            [
                vec![r(SFilterItemElement).hoist().one_or_more()],
                vec![t(QuotedItem)],
            ],
        )
        .rule_one_of_tokens(SFilterItemElement, &[Item, WildCard])
        .rule(
            SFilterNegatedItem,
            [vec![t(ExclamationMark), r(SFilterItem).hoist()]],
        )
        .build(Mapping)
}
