use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use thiserror::Error;

use super::Grammar;

/// How many times an element may match in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Once,
    Optional,
    OneOrMore,
    ZeroOrMore,
}

impl Occurrence {
    pub fn allows_zero(self) -> bool {
        matches!(self, Occurrence::Optional | Occurrence::ZeroOrMore)
    }

    pub fn allows_many(self) -> bool {
        matches!(self, Occurrence::OneOrMore | Occurrence::ZeroOrMore)
    }
}

/// What an element matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind<T, R> {
    Token(T),
    Rule(R),
}

/// One step of an alternative.
///
/// `exclude` drops the match from the tree (fixed punctuation). `hoist`
/// splices a sub-rule's children into the parent instead of nesting a node;
/// it has no effect on token elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<T, R> {
    pub kind: ElementKind<T, R>,
    pub occurrence: Occurrence,
    pub exclude: bool,
    pub hoist: bool,
}

impl<T, R> Element<T, R> {
    fn new(kind: ElementKind<T, R>) -> Self {
        Element {
            kind,
            occurrence: Occurrence::Once,
            exclude: false,
            hoist: false,
        }
    }

    pub fn token(kind: T) -> Self {
        Element::new(ElementKind::Token(kind))
    }

    pub fn rule(rule: R) -> Self {
        Element::new(ElementKind::Rule(rule))
    }

    pub fn optional(mut self) -> Self {
        self.occurrence = Occurrence::Optional;
        self
    }

    pub fn one_or_more(mut self) -> Self {
        self.occurrence = Occurrence::OneOrMore;
        self
    }

    pub fn zero_or_more(mut self) -> Self {
        self.occurrence = Occurrence::ZeroOrMore;
        self
    }

    pub fn exclude(mut self) -> Self {
        self.exclude = true;
        self
    }

    pub fn hoist(mut self) -> Self {
        self.hoist = true;
        self
    }
}

/// An ordered sequence of elements; one way a rule can match.
pub type Alternative<T, R> = Vec<Element<T, R>>;

/// Grammar configuration problems. These come from the code defining a
/// grammar, never from the text being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("the required rule '{0}' has not been defined")]
    UndefinedRule(String),

    #[error("the rule '{0}' has no alternatives")]
    EmptyRule(String),
}

/// Collects rules until [`GrammarBuilder::build`] seals them into a
/// [`Grammar`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder<T, R> {
    rules: HashMap<R, Vec<Alternative<T, R>>>,
}

impl<T, R> Default for GrammarBuilder<T, R> {
    fn default() -> Self {
        GrammarBuilder {
            rules: HashMap::new(),
        }
    }
}

impl<T, R> GrammarBuilder<T, R>
where
    T: Copy + Eq + Debug,
    R: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends alternatives to `rule`, creating it if needed. Alternatives are
    /// tried in the order they were added.
    pub fn rule(
        mut self,
        rule: R,
        alternatives: impl IntoIterator<Item = Alternative<T, R>>,
    ) -> Self {
        self.rules.entry(rule).or_default().extend(alternatives);
        self
    }

    /// A rule matching any single one of `tokens`.
    pub fn rule_one_of_tokens(self, rule: R, tokens: &[T]) -> Self {
        let alternatives = tokens.iter().map(|t| vec![Element::token(*t)]);
        self.rule(rule, alternatives.collect::<Vec<_>>())
    }

    /// A rule matching any single one of `rules`.
    pub fn rule_one_of_rules(self, rule: R, rules: &[R]) -> Self {
        let alternatives = rules.iter().map(|r| vec![Element::rule(*r)]);
        self.rule(rule, alternatives.collect::<Vec<_>>())
    }

    /// Seals the configuration. Every rule reachable from `root` must be
    /// defined and have at least one alternative.
    pub fn build(self, root: R) -> Result<Grammar<T, R>, GrammarError> {
        let mut visited = HashSet::new();
        let mut pending = vec![root];

        while let Some(rule) = pending.pop() {
            if !visited.insert(rule) {
                continue;
            }
            let alternatives = self
                .rules
                .get(&rule)
                .ok_or_else(|| GrammarError::UndefinedRule(format!("{rule:?}")))?;
            if alternatives.is_empty() {
                return Err(GrammarError::EmptyRule(format!("{rule:?}")));
            }

            for element in alternatives.iter().flatten() {
                if let ElementKind::Rule(dependency) = element.kind {
                    if !visited.contains(&dependency) {
                        pending.push(dependency);
                    }
                }
            }
        }

        Ok(Grammar::new(self.rules, root))
    }
}
