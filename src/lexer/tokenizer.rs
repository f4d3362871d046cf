use super::matcher::TokenMatcher;
use crate::ast::Token;

/// A table-driven tokenizer.
///
/// At every position each registered matcher reports its longest match. The
/// strictly longest one wins and ties go to whichever was registered first.
/// Characters nobody matches pile up into a single token of the default kind.
/// Tokenizing never fails.
#[derive(Debug, Clone)]
pub struct Tokenizer<T> {
    default_kind: T,
    matchers: Vec<(T, TokenMatcher)>,
}

impl<T: Copy> Tokenizer<T> {
    pub fn new(default_kind: T) -> Self {
        Tokenizer {
            default_kind,
            matchers: Vec::new(),
        }
    }

    pub fn token(mut self, kind: T, matcher: impl Into<TokenMatcher>) -> Self {
        self.matchers.push((kind, matcher.into()));
        self
    }

    pub fn tokenize(&self, input: &str) -> Vec<Token<T>> {
        let input: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut pending: Option<usize> = None;
        let mut position = 0;

        while position < input.len() {
            match self.best_match(&input[position..]) {
                Some((kind, length)) => {
                    if let Some(start) = pending.take() {
                        tokens.push(self.fallback(&input, start, position));
                    }
                    let text: String = input[position..position + length].iter().collect();
                    tokens.push(Token::new(kind, text, position));
                    position += length;
                }
                None => {
                    pending.get_or_insert(position);
                    position += 1;
                }
            }
        }

        if let Some(start) = pending {
            tokens.push(self.fallback(&input, start, input.len()));
        }

        tokens
    }

    fn best_match(&self, input: &[char]) -> Option<(T, usize)> {
        let mut best: Option<(T, usize)> = None;
        for (kind, matcher) in &self.matchers {
            let length = matcher.longest_match(input);
            if length > best.map_or(0, |(_, l)| l) {
                best = Some((*kind, length));
            }
        }
        best
    }

    fn fallback(&self, input: &[char], start: usize, end: usize) -> Token<T> {
        Token::new(self.default_kind, input[start..end].iter().collect::<String>(), start)
    }
}
