//! Tokenizing of mapping scripts.
//!
//! The generic pieces live in submodules: [`chars::CharMatcher`] predicates,
//! [`matcher::TokenMatcher`] recognisers (including the [`matcher::StateGraph`]
//! used for comments, quoted names, partials, variables and line
//! continuations) and the table-driven [`tokenizer::Tokenizer`]. This module
//! wires them into the mapping language's token table.

pub mod chars;
pub mod matcher;
pub mod tokenizer;

use std::sync::LazyLock;

use crate::ast::{MappingToken, TokenType};
use chars::CharMatcher;
use matcher::{StateGraph, TokenMatcher};
pub use tokenizer::Tokenizer;

static MAPPING_TOKENIZER: LazyLock<Tokenizer<TokenType>> = LazyLock::new(|| {
    Tokenizer::new(TokenType::Text)
        .token(TokenType::Comment, line_comment())
        .token(TokenType::Comment, block_comment())
        .token(TokenType::QuotedItem, quoted_item())
        .token(TokenType::Partial, delimited_name("<<", ">>"))
        .token(TokenType::Variable, delimited_name("$(", ")"))
        .token(TokenType::LineContinuation, line_continuation())
        .token(TokenType::NewLine, run_of("\r\n"))
        .token(TokenType::Whitespace, run_of(" \t"))
        .token(TokenType::PartialAssignment, TokenMatcher::sequence("::"))
        .token(TokenType::And, TokenMatcher::sequence("&&"))
        .token(TokenType::Or, TokenMatcher::sequence("||"))
        .token(TokenType::Equals, CharMatcher::single('='))
        .token(TokenType::Dot, CharMatcher::single('.'))
        .token(TokenType::ArrayMarker, TokenMatcher::sequence("[]"))
        .token(TokenType::OpenSquareBracket, CharMatcher::single('['))
        .token(TokenType::CloseSquareBracket, CharMatcher::single(']'))
        .token(TokenType::OpenCurlyBracket, CharMatcher::single('{'))
        .token(TokenType::CloseCurlyBracket, CharMatcher::single('}'))
        .token(TokenType::Comma, CharMatcher::single(','))
        .token(TokenType::QuestionMark, CharMatcher::single('?'))
        .token(TokenType::ExclamationMark, CharMatcher::single('!'))
        .token(TokenType::OpenRoundBracket, CharMatcher::single('('))
        .token(TokenType::CloseRoundBracket, CharMatcher::single(')'))
        .token(TokenType::Colon, CharMatcher::single(':'))
        .token(TokenType::Item, run(CharMatcher::name()))
        .token(TokenType::WildCard, CharMatcher::single('*'))
});

/// Splits a mapping script into tokens.
///
/// Every character ends up in exactly one token, whitespace and comments
/// included.
///
/// # Examples
///
/// ```
/// use jmap_lang::ast::TokenType;
/// use jmap_lang::lexer::tokenize;
///
/// let tokens = tokenize("a.b = $(k)");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenType::Item,
///         TokenType::Dot,
///         TokenType::Item,
///         TokenType::Whitespace,
///         TokenType::Equals,
///         TokenType::Whitespace,
///         TokenType::Variable,
///     ]
/// );
/// ```
pub fn tokenize(script: &str) -> Vec<MappingToken> {
    MAPPING_TOKENIZER.tokenize(script)
}

/// One or more characters accepted by `matcher`.
fn run(matcher: CharMatcher) -> StateGraph {
    let mut g = StateGraph::builder();
    let s = g.start(matcher);
    g.repeat(s).accept(s);
    g.build()
}

fn run_of(chars: &str) -> StateGraph {
    run(CharMatcher::any_of(chars))
}

/// `//` up to the end of the line.
fn line_comment() -> StateGraph {
    let mut g = StateGraph::builder();
    let first = g.start(CharMatcher::single('/'));
    let second = g.then(first, CharMatcher::single('/'));
    g.accept(second);
    let body = g.then(second, CharMatcher::none_of("\r\n"));
    g.repeat(body).accept(body);
    g.build()
}

/// `/*` up to the first `*/`.
fn block_comment() -> StateGraph {
    let mut g = StateGraph::builder();
    let slash = g.start(CharMatcher::single('/'));
    let open = g.then(slash, CharMatcher::single('*'));
    let body = g.then(open, CharMatcher::none_of("*"));
    g.repeat(body);
    let star = g.then(open, CharMatcher::single('*'));
    g.edge(body, star);
    // body also accepts '/', so the closing edge has to come first
    let close = g.then(star, CharMatcher::single('/'));
    g.accept(close);
    g.repeat(star).edge(star, body);
    g.build()
}

/// `"..."` where a quote inside is written `""`; the body is never empty.
fn quoted_item() -> StateGraph {
    let mut g = StateGraph::builder();
    let open = g.start(CharMatcher::single('"'));
    let body = g.then(open, CharMatcher::none_of("\""));
    g.repeat(body);
    // opening quote directly followed by an escaped quote
    let leading_escape = g.then(open, CharMatcher::single('"'));
    let escaped = g.then(leading_escape, CharMatcher::single('"'));
    let close = g.then(body, CharMatcher::single('"'));
    g.accept(close);
    g.edge(close, escaped);
    g.edge(escaped, body);
    g.edge(escaped, close);
    g.build()
}

/// `open` + one or more name characters + `close`.
fn delimited_name(open: &str, close: &str) -> StateGraph {
    let mut g = StateGraph::builder();
    let mut opening = open.chars();
    let mut last = match opening.next() {
        Some(c) => g.start(CharMatcher::single(c)),
        None => g.start(CharMatcher::name()),
    };
    for c in opening {
        last = g.then(last, CharMatcher::single(c));
    }
    let name = g.then(last, CharMatcher::name());
    g.repeat(name);
    let mut last = name;
    for c in close.chars() {
        last = g.then(last, CharMatcher::single(c));
    }
    g.accept(last);
    g.build()
}

/// Line break(s) followed by indentation, possibly across blank lines.
///
/// Accepts only once the walk is inside a run of spaces or tabs, so a plain
/// line break, or line breaks followed by a blank line, stay [`TokenType::NewLine`].
fn line_continuation() -> StateGraph {
    let mut g = StateGraph::builder();
    let breaks = g.start(CharMatcher::any_of("\r\n"));
    g.repeat(breaks);
    let indent = g.then(breaks, CharMatcher::any_of(" \t"));
    g.repeat(indent).accept(indent);
    let blank = g.then(indent, CharMatcher::any_of("\r\n"));
    g.repeat(blank);
    g.edge(blank, indent);
    g.build()
}
