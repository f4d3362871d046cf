//! A small backtracking parser generator.
//!
//! Rules are declared with a [`GrammarBuilder`] and sealed into an immutable
//! [`Grammar`], which parses token slices into [`ParseTree`]s.
//!
//! Matching is top-down ordered choice: the first alternative of a rule whose
//! whole element sequence matches wins, with no attempt to find a better one.
//! Repeated elements are greedy and never give back a repetition. Left
//! recursive rules are not supported.
//!
//! When parsing fails the engine reports the furthest token position any
//! attempted alternative reached, which is usually where the author went
//! wrong even though backtracking threw the partial parses away.

mod builder;

use std::{collections::HashMap, fmt::Debug, hash::Hash};

use thiserror::Error;

pub use builder::{Alternative, Element, ElementKind, GrammarBuilder, GrammarError, Occurrence};

use crate::ast::{ParseTree, Token};

/// Why a token sequence does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError<T: Debug> {
    /// Input ran out mid-rule. Carries the last token, if there was one.
    #[error("unexpected end of tokens")]
    UnexpectedEnd(Option<Token<T>>),

    #[error("unexpected token {:?} '{}' at index {}", .0.kind, .0.text, .0.offset)]
    UnexpectedToken(Token<T>),
}

/// A sealed set of rules with a designated root.
#[derive(Debug, Clone)]
pub struct Grammar<T, R> {
    rules: HashMap<R, Vec<Alternative<T, R>>>,
    root: R,
}

impl<T, R> Grammar<T, R>
where
    T: Copy + Eq + Debug,
    R: Copy + Eq + Hash + Debug,
{
    pub(crate) fn new(rules: HashMap<R, Vec<Alternative<T, R>>>, root: R) -> Self {
        Grammar { rules, root }
    }

    /// Parses `tokens` with the root rule, which must consume all of them.
    pub fn parse(&self, tokens: &[Token<T>]) -> Result<ParseTree<T, R>, SyntaxError<T>> {
        let mut parse = Parse {
            grammar: self,
            tokens,
            furthest: 0,
        };

        if let Some((tree, next)) = parse.rule(self.root, 0) {
            if next == tokens.len() {
                return Ok(tree);
            }
        }

        match tokens.get(parse.furthest) {
            Some(token) => Err(SyntaxError::UnexpectedToken(token.clone())),
            None => Err(SyntaxError::UnexpectedEnd(tokens.last().cloned())),
        }
    }
}

/// State of one call to [`Grammar::parse`].
struct Parse<'g, 't, T, R> {
    grammar: &'g Grammar<T, R>,
    tokens: &'t [Token<T>],
    furthest: usize,
}

impl<T, R> Parse<'_, '_, T, R>
where
    T: Copy + Eq + Debug,
    R: Copy + Eq + Hash + Debug,
{
    fn reached(&mut self, position: usize) {
        self.furthest = self.furthest.max(position);
    }

    fn rule(&mut self, rule: R, position: usize) -> Option<(ParseTree<T, R>, usize)> {
        let grammar = self.grammar;
        // sealing guarantees every reachable rule exists
        let alternatives = grammar.rules.get(&rule)?;

        'alternatives: for alternative in alternatives {
            let mut children = Vec::new();
            let mut at = position;
            for element in alternative {
                match self.element(element, at, &mut children) {
                    Some(next) => at = next,
                    None => continue 'alternatives,
                }
            }
            return Some((ParseTree::Rule { rule, children }, at));
        }

        None
    }

    /// Matches `element` honouring its occurrence, appending to `out`.
    /// Returns the position after the last repetition.
    fn element(
        &mut self,
        element: &Element<T, R>,
        position: usize,
        out: &mut Vec<ParseTree<T, R>>,
    ) -> Option<usize> {
        let Some(mut at) = self.once(element, position, out) else {
            return element.occurrence.allows_zero().then_some(position);
        };

        if element.occurrence.allows_many() {
            while at < self.tokens.len() {
                let mut repetition = Vec::new();
                match self.once(element, at, &mut repetition) {
                    // a repetition that consumes nothing would repeat forever
                    Some(next) if next > at => {
                        out.append(&mut repetition);
                        at = next;
                    }
                    _ => break,
                }
            }
        }

        Some(at)
    }

    /// A single match of `element` at `position`.
    fn once(
        &mut self,
        element: &Element<T, R>,
        position: usize,
        out: &mut Vec<ParseTree<T, R>>,
    ) -> Option<usize> {
        match element.kind {
            ElementKind::Token(kind) => {
                let token = self.tokens.get(position).filter(|t| t.kind == kind);
                let Some(token) = token else {
                    self.reached(position);
                    return None;
                };
                self.reached(position + 1);
                if !element.exclude {
                    out.push(ParseTree::Token(token.clone()));
                }
                Some(position + 1)
            }
            ElementKind::Rule(rule) => {
                let (tree, next) = self.rule(rule, position)?;
                if element.exclude {
                    return Some(next);
                }
                match tree {
                    ParseTree::Rule { children, .. } if element.hoist => out.extend(children),
                    tree => out.push(tree),
                }
                Some(next)
            }
        }
    }
}
