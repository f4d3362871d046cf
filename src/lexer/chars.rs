/// A predicate over a single character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharMatcher {
    Single(char),
    AnyOf(Vec<char>),
    /// Inclusive range
    Range(char, char),
    Union(Vec<CharMatcher>),
    Not(Box<CharMatcher>),
}

impl CharMatcher {
    pub fn single(c: char) -> Self {
        CharMatcher::Single(c)
    }

    pub fn any_of(chars: &str) -> Self {
        let mut chars: Vec<char> = chars.chars().collect();
        if chars.len() == 1 {
            CharMatcher::Single(chars.remove(0))
        } else {
            CharMatcher::AnyOf(chars)
        }
    }

    pub fn range(min: char, max: char) -> Self {
        CharMatcher::Range(min, max)
    }

    pub fn union(matchers: impl IntoIterator<Item = CharMatcher>) -> Self {
        CharMatcher::Union(matchers.into_iter().collect())
    }

    pub fn none_of(chars: &str) -> Self {
        CharMatcher::any_of(chars).negate()
    }

    pub fn negate(self) -> Self {
        match self {
            CharMatcher::Not(inner) => *inner,
            other => CharMatcher::Not(Box::new(other)),
        }
    }

    /// `[A-Za-z0-9_-]`, the characters of names, variables and partials.
    pub fn name() -> Self {
        CharMatcher::union([
            CharMatcher::range('a', 'z'),
            CharMatcher::range('A', 'Z'),
            CharMatcher::range('0', '9'),
            CharMatcher::any_of("_-"),
        ])
    }

    pub fn is_match(&self, c: char) -> bool {
        match self {
            CharMatcher::Single(expected) => c == *expected,
            CharMatcher::AnyOf(set) => set.contains(&c),
            CharMatcher::Range(min, max) => (*min..=*max).contains(&c),
            CharMatcher::Union(matchers) => matchers.iter().any(|m| m.is_match(c)),
            CharMatcher::Not(inner) => !inner.is_match(c),
        }
    }
}
